mod clock;
mod random;
mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use random::{FixedRandom, RandomSource, SeededRandom, ThreadRandom};
pub use storage::{read_json, write_json, FileStorage, MemoryStorage, Storage};
