use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The guess was below the secret; the player should guess higher.
    TooLow,
    /// The guess was above the secret; the player should guess lower.
    TooHigh,
    Won { elapsed: Duration, attempts: u32 },
}

impl Verdict {
    pub fn is_won(&self) -> bool {
        matches!(self, Verdict::Won { .. })
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::TooLow => write!(f, "Too low! Guess higher."),
            Verdict::TooHigh => write!(f, "Too high! Guess lower."),
            Verdict::Won { elapsed, attempts } => write!(
                f,
                "You got it in {} {} and {:.1}s!",
                attempts,
                if *attempts == 1 { "attempt" } else { "attempts" },
                elapsed.as_secs_f64()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_messages() {
        assert_eq!(Verdict::TooLow.to_string(), "Too low! Guess higher.");
        assert_eq!(Verdict::TooHigh.to_string(), "Too high! Guess lower.");
        let won = Verdict::Won {
            elapsed: Duration::from_millis(12_340),
            attempts: 1,
        };
        assert_eq!(won.to_string(), "You got it in 1 attempt and 12.3s!");
        assert!(won.is_won());
        assert!(!Verdict::TooLow.is_won());
    }
}
