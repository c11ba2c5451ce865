//! Android backends, reached through JNI.
//!
//! Every call attaches the current thread (a no-op on the main thread) and
//! runs inside a local frame so repeated calls do not leak local references.

mod content;
mod entry;
mod scanner;
mod storage;

pub use content::AndroidContentSource;
pub use scanner::AndroidMediaScanner;
pub use storage::AndroidStorageBroker;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use jni::objects::{GlobalRef, JObject, JString, JValue};
use jni::{JNIEnv, JavaVM};

use crate::error::{HostError, Result};
use crate::host::Backends;

/// The process JavaVM plus a global reference to the application context.
#[derive(Clone)]
pub struct AndroidContext {
    vm: Arc<JavaVM>,
    context: GlobalRef,
}

impl AndroidContext {
    /// Pick up the VM and context registered by the activity glue.
    ///
    /// The glue must have initialised `ndk_context` first; reading it before
    /// that panics inside `ndk_context`.
    pub fn from_ndk() -> Result<Self> {
        let ctx = ndk_context::android_context();

        // SAFETY: ndk_context hands out the process JavaVM, valid for its lifetime.
        let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }.map_err(platform_error)?;
        let context = {
            let env = vm.attach_current_thread().map_err(platform_error)?;
            // SAFETY: the context pointer is a global reference owned by the glue code.
            let activity = unsafe { JObject::from_raw(ctx.context().cast()) };
            let global = env.new_global_ref(&activity).map_err(platform_error)?;
            global
        };

        Ok(Self {
            vm: Arc::new(vm),
            context,
        })
    }

    pub(crate) fn with_env<T, F>(&self, f: F) -> io::Result<T>
    where
        F: FnOnce(&mut JNIEnv, &JObject) -> jni::errors::Result<T>,
    {
        let mut env = self.vm.attach_current_thread().map_err(jni_error)?;
        let context = self.context.as_obj();
        let result = env.with_local_frame(32, |env| f(env, context));
        result.map_err(|e| clear_exception(&mut env, e))
    }

    /// Cache directory of the app (`Context.getCacheDir()`).
    pub fn cache_dir(&self) -> io::Result<PathBuf> {
        self.with_env(|env, context| {
            let dir = env
                .call_method(context, "getCacheDir", "()Ljava/io/File;", &[])?
                .l()?;
            absolute_path(env, &dir)
        })
        .map(PathBuf::from)
    }

    /// Build the full backend set on top of this context.
    pub fn backends(&self) -> Result<Backends> {
        let storage = AndroidStorageBroker::new(self.clone())
            .map_err(|e| HostError::Platform(format!("storage broker unavailable: {}", e)))?;
        let cache_dir = self
            .cache_dir()
            .map_err(|e| HostError::Platform(format!("cache directory unavailable: {}", e)))?;
        Ok(Backends {
            content: Arc::new(AndroidContentSource::new(self.clone())),
            storage: Arc::new(storage),
            scanner: Arc::new(AndroidMediaScanner::new(self.clone())),
            cache_dir,
        })
    }
}

fn platform_error(e: jni::errors::Error) -> HostError {
    HostError::Platform(format!("JNI: {}", e))
}

fn jni_error(e: jni::errors::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("JNI: {}", e))
}

/// Log and clear any pending Java exception so the thread stays usable.
fn clear_exception(env: &mut JNIEnv, e: jni::errors::Error) -> io::Error {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
    jni_error(e)
}

pub(crate) fn content_resolver<'local>(
    env: &mut JNIEnv<'local>,
    context: &JObject,
) -> jni::errors::Result<JObject<'local>> {
    env.call_method(
        context,
        "getContentResolver",
        "()Landroid/content/ContentResolver;",
        &[],
    )?
    .l()
}

pub(crate) fn parse_uri<'local>(
    env: &mut JNIEnv<'local>,
    uri: &str,
) -> jni::errors::Result<JObject<'local>> {
    let text = env.new_string(uri)?;
    env.call_static_method(
        "android/net/Uri",
        "parse",
        "(Ljava/lang/String;)Landroid/net/Uri;",
        &[JValue::Object(&text)],
    )?
    .l()
}

/// `obj.toString()`, or `None` for a null reference.
pub(crate) fn to_string_opt(
    env: &mut JNIEnv,
    obj: &JObject,
) -> jni::errors::Result<Option<String>> {
    if obj.is_null() {
        return Ok(None);
    }
    let text = env
        .call_method(obj, "toString", "()Ljava/lang/String;", &[])?
        .l()?;
    java_string(env, text)
}

pub(crate) fn java_string(
    env: &mut JNIEnv,
    obj: JObject,
) -> jni::errors::Result<Option<String>> {
    if obj.is_null() {
        return Ok(None);
    }
    let text = JString::from(obj);
    let value: String = env.get_string(&text)?.into();
    Ok(Some(value))
}

fn absolute_path(env: &mut JNIEnv, file: &JObject) -> jni::errors::Result<String> {
    let path = env
        .call_method(file, "getAbsolutePath", "()Ljava/lang/String;", &[])?
        .l()?;
    Ok(java_string(env, path)?.unwrap_or_default())
}
