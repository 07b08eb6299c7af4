mod analyze_measurement;
mod lookup_host;

pub use analyze_measurement::AnalyzeMeasurementUseCase;
pub use lookup_host::LookupHostUseCase;
