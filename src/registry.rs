//! Vendor registry: looks up the importer/exporter for a [`Format`].

use std::collections::HashMap;

use crate::error::{Result, TranscodeError};
use crate::formats::alexa::Alexa;
use crate::formats::dialogflow::Dialogflow;
use crate::formats::wit::Wit;
use crate::formats::{Format, Vendor};

/// Registry of the vendors a session can import from and export to
pub struct VendorRegistry {
    vendors: HashMap<Format, Box<dyn Vendor>>,
}

impl VendorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            vendors: HashMap::new(),
        }
    }

    /// Create a registry with the Alexa, Wit.ai and DialogFlow vendors
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(Alexa));
        registry.register(Box::new(Wit));
        registry.register(Box::new(Dialogflow));
        registry
    }

    /// Register a vendor under its own format, replacing any previous one
    pub fn register(&mut self, vendor: Box<dyn Vendor>) {
        self.vendors.insert(vendor.format(), vendor);
    }

    /// Look up the vendor for a format
    ///
    /// # Errors
    ///
    /// `UnsupportedFormat` if nothing is registered for `format`.
    pub fn get(&self, format: Format) -> Result<&dyn Vendor> {
        self.vendors
            .get(&format)
            .map(|vendor| &**vendor)
            .ok_or_else(|| TranscodeError::UnsupportedFormat(format.flag().to_string()))
    }

    /// Check if a vendor is registered
    pub fn has_vendor(&self, format: Format) -> bool {
        self.vendors.contains_key(&format)
    }

    /// Registered formats, sorted
    pub fn list_formats(&self) -> Vec<Format> {
        let mut formats: Vec<Format> = self.vendors.keys().copied().collect();
        formats.sort();
        formats
    }
}

impl Default for VendorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
