//! State shared by the variable interpreters while parsing one source

use dracut_net_core::{
    DescriptorRegistry, InterfaceDescriptor, LinkKind, Origin, Result,
};

use crate::hostname::{is_valid_hostname, HostnameLookup};

/// Registry and provenance of the source currently being parsed
pub struct ParseContext<'a> {
    pub registry: &'a mut DescriptorRegistry,
    pub filename: &'a str,
    pub hostname: &'a dyn HostnameLookup,
}

impl<'a> ParseContext<'a> {
    pub fn new(
        registry: &'a mut DescriptorRegistry,
        filename: &'a str,
        hostname: &'a dyn HostnameLookup,
    ) -> Self {
        Self {
            registry,
            filename,
            hostname,
        }
    }

    pub fn origin(&self) -> Origin {
        Origin::cmdline(self.filename)
    }

    /// Default hostname, if the lookup yields a valid one
    pub fn default_hostname(&self) -> Option<String> {
        let hostname = self.hostname.default_hostname()?;
        if is_valid_hostname(&hostname) {
            Some(hostname)
        } else {
            log::warn!("Ignoring invalid default hostname '{}'", hostname);
            None
        }
    }

    /// Create a named descriptor and register it once `build` succeeds
    ///
    /// Nothing is registered when the name is invalid or `build` fails.
    pub fn register<F>(&mut self, name: &str, kind: LinkKind, build: F) -> Result<()>
    where
        F: FnOnce(&mut InterfaceDescriptor) -> Result<()>,
    {
        let mut descriptor = InterfaceDescriptor::named(name, kind, self.origin())?;
        build(&mut descriptor)?;
        self.registry.insert(descriptor)
    }

    /// Modify the default descriptor, creating it when missing
    ///
    /// Works on a copy; the registry only sees the result when `update`
    /// succeeds.
    pub fn update_default<F>(&mut self, update: F) -> Result<()>
    where
        F: FnOnce(&mut InterfaceDescriptor) -> Result<()>,
    {
        let mut descriptor = match self.registry.get_default() {
            Some(existing) => existing.clone(),
            None => InterfaceDescriptor::new(None, LinkKind::Ethernet, self.origin()),
        };

        update(&mut descriptor)?;

        let index = self.registry.default_index();
        self.registry.take_default();
        self.registry.restore(descriptor, index)
    }
}
