/// Something that consumes events of type `T` one at a time.
pub trait EventHandler<T> {
    fn handle_event(&mut self, event: &T);
}
