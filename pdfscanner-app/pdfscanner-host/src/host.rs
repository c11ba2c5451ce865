use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::bridge::{
    IntentChannel, MediaStoreChannel, MethodCall, MethodCallHandler, MethodResult, PdfListener,
};
use crate::config::HostConfig;
use crate::downloads::{DownloadsWriter, StorageBroker};
use crate::intent::{ActivationEvent, ContentSource, IntentResolver};
use crate::media_scan::MediaScanner;

/// Platform services the host is built on.
#[derive(Clone)]
pub struct Backends {
    pub content: Arc<dyn ContentSource>,
    pub storage: Arc<dyn StorageBroker>,
    pub scanner: Arc<dyn MediaScanner>,
    pub cache_dir: PathBuf,
}

/// Glue between OS activations, the UI channels and shared storage.
pub struct PdfHost {
    config: HostConfig,
    resolver: IntentResolver,
    media_store: MediaStoreChannel,
    intents: IntentChannel,
}

impl PdfHost {
    pub fn new(config: HostConfig, backends: Backends) -> Self {
        let cache_dir = config.cache_dir.clone().unwrap_or(backends.cache_dir);
        let resolver = IntentResolver::with_config(backends.content, cache_dir, &config);
        let writer = DownloadsWriter::new(backends.storage, backends.scanner)
            .with_modern_min_sdk(config.modern_storage_min_sdk);

        Self {
            config,
            resolver,
            media_store: MediaStoreChannel::new(writer),
            intents: IntentChannel::new(),
        }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn resolver(&self) -> &IntentResolver {
        &self.resolver
    }

    pub fn media_store(&self) -> &MediaStoreChannel {
        &self.media_store
    }

    pub fn intents(&mut self) -> &mut IntentChannel {
        &mut self.intents
    }

    /// The event the app was launched with. Parks the result for a later pull.
    pub fn on_launch(&mut self, event: Option<&ActivationEvent>) {
        let path = event.and_then(|e| self.resolver.resolve(e));
        info!("Launch activation resolved to {:?}", path);
        self.intents.set_initial(path);
    }

    /// An activation delivered to the already-running app.
    pub fn on_new_intent(&mut self, event: &ActivationEvent) {
        match self.resolver.resolve(event) {
            Some(path) => {
                info!("New activation resolved to {}", path);
                self.intents.deliver(path);
            }
            None => debug!("New activation carried no PDF"),
        }
    }

    pub fn attach_listener(&mut self, listener: Box<dyn PdfListener>) {
        self.intents.attach(listener);
    }

    pub fn detach_listener(&mut self) {
        self.intents.detach();
    }

    /// Route a call to the channel registered under `channel`.
    pub fn handle(&mut self, channel: &str, call: &MethodCall) -> MethodResult {
        if channel == self.config.media_store_channel {
            self.media_store.on_method_call(call)
        } else if channel == self.config.intent_channel {
            self.intents.on_method_call(call)
        } else {
            debug!("Call to unknown channel {}", channel);
            MethodResult::NotImplemented
        }
    }
}
