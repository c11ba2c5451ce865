use jni::objects::{JObject, JValue};
use jni::sys::{jboolean, JNI_FALSE};
use jni::JNIEnv;
use tracing::{debug, error};

use super::{java_string, to_string_opt};
use crate::activation::{router, Activation};
use crate::intent::{ActivationEvent, IntentAction, ResourceLocator};

const EXTRA_STREAM: &str = "android.intent.extra.STREAM";

/// Called by `MainActivity` from `onCreate` (launch) and `onNewIntent`.
#[no_mangle]
pub extern "system" fn Java_com_example_pdfscanner_MainActivity_nativeOnIntent<'local>(
    mut env: JNIEnv<'local>,
    _activity: JObject<'local>,
    intent: JObject<'local>,
    is_launch: jboolean,
) {
    let event = match read_intent(&mut env, &intent) {
        Ok(event) => event,
        Err(e) => {
            if env.exception_check().unwrap_or(false) {
                let _ = env.exception_clear();
            }
            error!("Failed to read activation intent: {}", e);
            None
        }
    };

    let activation = if is_launch != JNI_FALSE {
        Activation::Launch(event)
    } else {
        match event {
            Some(event) => Activation::NewIntent(event),
            None => {
                debug!("New intent carried no action");
                return;
            }
        }
    };
    router().dispatch(activation);
}

fn read_intent(
    env: &mut JNIEnv,
    intent: &JObject,
) -> jni::errors::Result<Option<ActivationEvent>> {
    if intent.is_null() {
        return Ok(None);
    }

    let action = env
        .call_method(intent, "getAction", "()Ljava/lang/String;", &[])?
        .l()?;
    let Some(action) = java_string(env, action)? else {
        return Ok(None);
    };
    let action = IntentAction::from_android(&action);

    let mime_type = env
        .call_method(intent, "getType", "()Ljava/lang/String;", &[])?
        .l()?;
    let mime_type = java_string(env, mime_type)?;

    let data = env
        .call_method(intent, "getData", "()Landroid/net/Uri;", &[])?
        .l()?;
    let data = to_string_opt(env, &data)?.map(ResourceLocator::parse);

    let streams = match action {
        IntentAction::Send => single_stream(env, intent)?.into_iter().collect(),
        IntentAction::SendMultiple => stream_list(env, intent)?,
        _ => Vec::new(),
    };

    Ok(Some(ActivationEvent {
        action,
        mime_type,
        data,
        streams,
    }))
}

fn single_stream(
    env: &mut JNIEnv,
    intent: &JObject,
) -> jni::errors::Result<Option<ResourceLocator>> {
    let key = env.new_string(EXTRA_STREAM)?;
    let uri = env
        .call_method(
            intent,
            "getParcelableExtra",
            "(Ljava/lang/String;)Landroid/os/Parcelable;",
            &[JValue::Object(&key)],
        )?
        .l()?;
    Ok(to_string_opt(env, &uri)?.map(ResourceLocator::parse))
}

fn stream_list(env: &mut JNIEnv, intent: &JObject) -> jni::errors::Result<Vec<ResourceLocator>> {
    let key = env.new_string(EXTRA_STREAM)?;
    let list = env
        .call_method(
            intent,
            "getParcelableArrayListExtra",
            "(Ljava/lang/String;)Ljava/util/ArrayList;",
            &[JValue::Object(&key)],
        )?
        .l()?;
    if list.is_null() {
        return Ok(Vec::new());
    }

    let size = env.call_method(&list, "size", "()I", &[])?.i()?;
    let mut streams = Vec::with_capacity(size.max(0) as usize);
    for index in 0..size {
        let item = env
            .call_method(&list, "get", "(I)Ljava/lang/Object;", &[JValue::Int(index)])?
            .l()?;
        if let Some(uri) = to_string_opt(env, &item)? {
            streams.push(ResourceLocator::parse(uri));
        }
        env.delete_local_ref(item)?;
    }
    Ok(streams)
}
