mod analyze;
mod lookup;

pub use analyze::analyze;
pub use lookup::lookup;
