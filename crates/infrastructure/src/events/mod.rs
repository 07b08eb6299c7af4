mod collector;
mod emitter;

pub use collector::EventCollector;
pub use emitter::EventEmitter;
