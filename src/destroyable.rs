/// Releases channel subscriptions that hold an `Rc` back to their owner.
/// Without this the owner and its listeners keep each other alive.
pub trait Destroyable {
    fn destroy(&mut self);
}
