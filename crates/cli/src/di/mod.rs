use ferrous_probe_application::ports::{AsnLookup, Resolver};
use ferrous_probe_application::use_cases::LookupHostUseCase;
use ferrous_probe_domain::ProbeConfig;
use ferrous_probe_infrastructure::asn::NoAsnLookup;
use ferrous_probe_infrastructure::dns::new_resolver;
use ferrous_probe_infrastructure::events::{EventCollector, EventEmitter};
use std::sync::Arc;

/// Everything one measurement run needs, wired from the configuration.
pub struct ProbeServices {
    pub resolver: Arc<dyn Resolver>,
    pub asn: Arc<dyn AsnLookup>,
    pub lookup_host: LookupHostUseCase,
}

impl ProbeServices {
    pub fn new(config: &ProbeConfig) -> anyhow::Result<(Self, EventCollector)> {
        let (emitter, collector) = EventEmitter::new_enabled();
        let asn: Arc<dyn AsnLookup> = Arc::new(NoAsnLookup);
        let resolver = new_resolver(config, emitter, asn.clone())?;

        Ok((
            Self {
                lookup_host: LookupHostUseCase::new(resolver.clone()),
                resolver,
                asn,
            },
            collector,
        ))
    }
}
