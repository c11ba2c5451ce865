use std::io::{self, Read};

use jni::objects::{GlobalRef, JValue};
use tracing::warn;

use super::{content_resolver, parse_uri, AndroidContext};
use crate::intent::{ContentSource, ResourceLocator};

/// Largest slice moved across JNI per read.
const CHUNK: usize = 64 * 1024;

/// `ContentResolver.openInputStream` behind [`ContentSource`].
pub struct AndroidContentSource {
    ctx: AndroidContext,
}

impl AndroidContentSource {
    pub fn new(ctx: AndroidContext) -> Self {
        Self { ctx }
    }
}

impl ContentSource for AndroidContentSource {
    fn open(&self, locator: &ResourceLocator) -> io::Result<Box<dyn Read + '_>> {
        let stream = self.ctx.with_env(|env, context| {
            let resolver = content_resolver(env, context)?;
            let uri = parse_uri(env, locator.as_str())?;
            let stream = env
                .call_method(
                    &resolver,
                    "openInputStream",
                    "(Landroid/net/Uri;)Ljava/io/InputStream;",
                    &[JValue::Object(&uri)],
                )?
                .l()?;
            if stream.is_null() {
                return Ok(None);
            }
            Ok(Some(env.new_global_ref(&stream)?))
        })?;

        match stream {
            Some(stream) => Ok(Box::new(JavaInputStream {
                ctx: &self.ctx,
                stream,
            })),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("content resolver returned no stream for {}", locator),
            )),
        }
    }
}

/// `java.io.InputStream` adapted to [`Read`]. Closed on drop.
struct JavaInputStream<'a> {
    ctx: &'a AndroidContext,
    stream: GlobalRef,
}

impl Read for JavaInputStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let len = buf.len().min(CHUNK);
        let stream = &self.stream;

        let chunk = self.ctx.with_env(|env, _| {
            let array = env.new_byte_array(len as i32)?;
            let read = env
                .call_method(
                    stream,
                    "read",
                    "([BII)I",
                    &[JValue::Object(&array), JValue::Int(0), JValue::Int(len as i32)],
                )?
                .i()?;
            if read <= 0 {
                return Ok(Vec::new());
            }
            let mut bytes = vec![0i8; read as usize];
            env.get_byte_array_region(&array, 0, &mut bytes)?;
            Ok(bytes)
        })?;

        for (dst, src) in buf.iter_mut().zip(&chunk) {
            *dst = *src as u8;
        }
        Ok(chunk.len())
    }
}

impl Drop for JavaInputStream<'_> {
    fn drop(&mut self) {
        let stream = &self.stream;
        if let Err(e) = self
            .ctx
            .with_env(|env, _| env.call_method(stream, "close", "()V", &[]).map(|_| ()))
        {
            warn!("Failed to close content stream: {}", e);
        }
    }
}
