use jni::objects::{JObject, JValue};
use tracing::{debug, warn};

use super::AndroidContext;
use crate::media_scan::{MediaScanner, ScanCallback};

/// `MediaScannerConnection.scanFile` with no completion listener.
pub struct AndroidMediaScanner {
    ctx: AndroidContext,
}

impl AndroidMediaScanner {
    pub fn new(ctx: AndroidContext) -> Self {
        Self { ctx }
    }
}

impl MediaScanner for AndroidMediaScanner {
    fn scan_file(&self, path: &str, on_complete: Option<ScanCallback>) {
        // Completion is never observed.
        drop(on_complete);

        let result = self.ctx.with_env(|env, context| {
            let path = env.new_string(path)?;
            let paths = env.new_object_array(1, "java/lang/String", &path)?;
            let null = JObject::null();
            env.call_static_method(
                "android/media/MediaScannerConnection",
                "scanFile",
                "(Landroid/content/Context;[Ljava/lang/String;[Ljava/lang/String;Landroid/media/MediaScannerConnection$OnScanCompletedListener;)V",
                &[
                    JValue::Object(context),
                    JValue::Object(&paths),
                    JValue::Object(&null),
                    JValue::Object(&null),
                ],
            )?;
            Ok(())
        });

        match result {
            Ok(()) => debug!("Media scan requested for {}", path),
            Err(e) => warn!("Media scan request for {} failed: {}", path, e),
        }
    }
}
