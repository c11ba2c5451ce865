use std::io::{self, Write};
use std::path::PathBuf;

use jni::objects::{GlobalRef, JObject, JValue};
use jni::JNIEnv;
use tracing::{debug, warn};

use super::{absolute_path, content_resolver, parse_uri, to_string_opt, AndroidContext};
use crate::downloads::{DownloadMetadata, PendingDownload, StorageBroker};

const CHUNK: usize = 64 * 1024;

const DISPLAY_NAME: &str = "_display_name";
const MIME_TYPE: &str = "mime_type";
const RELATIVE_PATH: &str = "relative_path";
const IS_PENDING: &str = "is_pending";

const ACTION_MEDIA_SCANNER_SCAN_FILE: &str = "android.intent.action.MEDIA_SCANNER_SCAN_FILE";

/// `MediaStore.Downloads` (API 29+) and the public Downloads directory.
pub struct AndroidStorageBroker {
    ctx: AndroidContext,
    sdk_int: u32,
}

impl AndroidStorageBroker {
    pub fn new(ctx: AndroidContext) -> io::Result<Self> {
        let sdk_int = ctx.with_env(|env, _| {
            env.get_static_field("android/os/Build$VERSION", "SDK_INT", "I")?
                .i()
        })?;
        debug!("Running on SDK {}", sdk_int);
        Ok(Self {
            ctx,
            sdk_int: sdk_int.max(0) as u32,
        })
    }
}

fn content_values<'local>(env: &mut JNIEnv<'local>) -> jni::errors::Result<JObject<'local>> {
    env.new_object("android/content/ContentValues", "()V", &[])
}

fn put_string(
    env: &mut JNIEnv,
    values: &JObject,
    key: &str,
    value: &str,
) -> jni::errors::Result<()> {
    let key = env.new_string(key)?;
    let value = env.new_string(value)?;
    env.call_method(
        values,
        "put",
        "(Ljava/lang/String;Ljava/lang/String;)V",
        &[JValue::Object(&key), JValue::Object(&value)],
    )?;
    Ok(())
}

fn put_int(env: &mut JNIEnv, values: &JObject, key: &str, value: i32) -> jni::errors::Result<()> {
    let key = env.new_string(key)?;
    let boxed = env
        .call_static_method(
            "java/lang/Integer",
            "valueOf",
            "(I)Ljava/lang/Integer;",
            &[JValue::Int(value)],
        )?
        .l()?;
    env.call_method(
        values,
        "put",
        "(Ljava/lang/String;Ljava/lang/Integer;)V",
        &[JValue::Object(&key), JValue::Object(&boxed)],
    )?;
    Ok(())
}

impl StorageBroker for AndroidStorageBroker {
    fn sdk_int(&self) -> u32 {
        self.sdk_int
    }

    fn insert_pending(&self, meta: &DownloadMetadata) -> io::Result<Option<PendingDownload>> {
        self.ctx.with_env(|env, context| {
            let values = content_values(env)?;
            put_string(env, &values, DISPLAY_NAME, &meta.display_name)?;
            put_string(env, &values, MIME_TYPE, &meta.mime_type)?;
            put_string(env, &values, RELATIVE_PATH, &meta.relative_path)?;
            put_int(env, &values, IS_PENDING, 1)?;

            let collection = env
                .get_static_field(
                    "android/provider/MediaStore$Downloads",
                    "EXTERNAL_CONTENT_URI",
                    "Landroid/net/Uri;",
                )?
                .l()?;
            let resolver = content_resolver(env, context)?;
            let uri = env
                .call_method(
                    &resolver,
                    "insert",
                    "(Landroid/net/Uri;Landroid/content/ContentValues;)Landroid/net/Uri;",
                    &[JValue::Object(&collection), JValue::Object(&values)],
                )?
                .l()?;

            Ok(to_string_opt(env, &uri)?.map(|uri| PendingDownload { uri }))
        })
    }

    fn open_output(&self, entry: &PendingDownload) -> io::Result<Box<dyn Write + '_>> {
        let stream = self.ctx.with_env(|env, context| {
            let resolver = content_resolver(env, context)?;
            let uri = parse_uri(env, &entry.uri)?;
            let stream = env
                .call_method(
                    &resolver,
                    "openOutputStream",
                    "(Landroid/net/Uri;)Ljava/io/OutputStream;",
                    &[JValue::Object(&uri)],
                )?
                .l()?;
            if stream.is_null() {
                return Ok(None);
            }
            Ok(Some(env.new_global_ref(&stream)?))
        })?;

        let stream = stream.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("content resolver returned no stream for {}", entry.uri),
            )
        })?;
        Ok(Box::new(JavaOutputStream {
            ctx: &self.ctx,
            stream,
        }))
    }

    fn publish(&self, entry: &PendingDownload) -> io::Result<()> {
        self.ctx.with_env(|env, context| {
            let values = content_values(env)?;
            put_int(env, &values, IS_PENDING, 0)?;
            let resolver = content_resolver(env, context)?;
            let uri = parse_uri(env, &entry.uri)?;
            let null = JObject::null();
            env.call_method(
                &resolver,
                "update",
                "(Landroid/net/Uri;Landroid/content/ContentValues;Ljava/lang/String;[Ljava/lang/String;)I",
                &[
                    JValue::Object(&uri),
                    JValue::Object(&values),
                    JValue::Object(&null),
                    JValue::Object(&null),
                ],
            )?;
            Ok(())
        })
    }

    fn notify_media_changed(&self, entry: &PendingDownload) -> io::Result<()> {
        self.ctx.with_env(|env, context| {
            let action = env.new_string(ACTION_MEDIA_SCANNER_SCAN_FILE)?;
            let uri = parse_uri(env, &entry.uri)?;
            let intent = env.new_object(
                "android/content/Intent",
                "(Ljava/lang/String;Landroid/net/Uri;)V",
                &[JValue::Object(&action), JValue::Object(&uri)],
            )?;
            env.call_method(
                context,
                "sendBroadcast",
                "(Landroid/content/Intent;)V",
                &[JValue::Object(&intent)],
            )?;
            Ok(())
        })
    }

    fn public_downloads_dir(&self) -> io::Result<PathBuf> {
        self.ctx
            .with_env(|env, _| {
                let name = env
                    .get_static_field(
                        "android/os/Environment",
                        "DIRECTORY_DOWNLOADS",
                        "Ljava/lang/String;",
                    )?
                    .l()?;
                let dir = env
                    .call_static_method(
                        "android/os/Environment",
                        "getExternalStoragePublicDirectory",
                        "(Ljava/lang/String;)Ljava/io/File;",
                        &[JValue::Object(&name)],
                    )?
                    .l()?;
                absolute_path(env, &dir)
            })
            .map(PathBuf::from)
    }
}

/// `java.io.OutputStream` adapted to [`Write`]. Closed on drop.
struct JavaOutputStream<'a> {
    ctx: &'a AndroidContext,
    stream: GlobalRef,
}

impl Write for JavaOutputStream<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let chunk = &buf[..buf.len().min(CHUNK)];
        let stream = &self.stream;
        self.ctx.with_env(|env, _| {
            let array = env.byte_array_from_slice(chunk)?;
            env.call_method(
                stream,
                "write",
                "([BII)V",
                &[
                    JValue::Object(&array),
                    JValue::Int(0),
                    JValue::Int(chunk.len() as i32),
                ],
            )?;
            Ok(())
        })?;
        Ok(chunk.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let stream = &self.stream;
        self.ctx
            .with_env(|env, _| env.call_method(stream, "flush", "()V", &[]).map(|_| ()))
    }
}

impl Drop for JavaOutputStream<'_> {
    fn drop(&mut self) {
        let stream = &self.stream;
        if let Err(e) = self
            .ctx
            .with_env(|env, _| env.call_method(stream, "close", "()V", &[]).map(|_| ()))
        {
            warn!("Failed to close download stream: {}", e);
        }
    }
}
