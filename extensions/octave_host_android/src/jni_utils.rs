//! JNI utilities for Android platform
//!
//! Provides a cached JVM/activity pair and helpers for the Android APIs the
//! host bridge touches.

use android_activity::AndroidApp;

use jni::objects::{GlobalRef, JObject, JValue};
use jni::{JNIEnv, JavaVM};

use octave_host::{HostError, Result};

use tracing::{debug, warn};

/// Local references reserved for one [`JniContext::with_env`] call
const LOCAL_FRAME_CAPACITY: i32 = 16;

/// Convert JNI failures into host errors with some context
pub trait JniResultExt<T> {
    /// Map the error to [`HostError::Platform`]
    fn host_err(self, context: &str) -> Result<T>;
}

impl<T> JniResultExt<T> for jni::errors::Result<T> {
    fn host_err(self, context: &str) -> Result<T> {
        self.map_err(|e| HostError::Platform(format!("{}: {}", context, e)))
    }
}

/// JavaVM plus a global reference to the hosting activity
pub struct JniContext {
    vm: JavaVM,
    activity: GlobalRef,
}

impl JniContext {
    /// Capture the VM and activity of an android-activity app
    pub fn from_app(app: &AndroidApp) -> Result<Self> {
        let vm = unsafe { JavaVM::from_raw(app.vm_as_ptr() as *mut _) }
            .host_err("Failed to get JavaVM")?;

        let activity_ptr = app.activity_as_ptr();
        if activity_ptr.is_null() {
            return Err(HostError::Platform("Activity pointer is null".to_string()));
        }

        let activity = {
            let env = vm
                .attach_current_thread()
                .host_err("Failed to attach JNI thread")?;
            let local = unsafe { JObject::from_raw(activity_ptr as jni::sys::jobject) };
            env.new_global_ref(local)
                .host_err("Failed to pin activity reference")?
        };

        Ok(Self { vm, activity })
    }

    /// Run `f` with an attached environment and the activity object
    ///
    /// `f` runs inside its own local reference frame, so any local it creates
    /// is released on return; only global references may escape. A pending
    /// Java exception is described to logcat and cleared before returning,
    /// so one failed call never poisons the next.
    pub fn with_env<R, F>(&self, f: F) -> jni::errors::Result<R>
    where
        F: FnOnce(&mut JNIEnv, &JObject) -> jni::errors::Result<R>,
    {
        let mut env = self.vm.attach_current_thread()?;
        // android_main stays attached, so locals are only freed with the frame
        let activity = self.activity.as_obj();
        let result = env.with_local_frame(LOCAL_FRAME_CAPACITY, |env| f(env, activity));
        if env.exception_check()? {
            let _ = env.exception_describe();
            env.exception_clear()?;
        }
        result
    }

    /// `Build.VERSION.SDK_INT` of the running device
    pub fn sdk_int(&self) -> Result<i32> {
        let sdk = self
            .with_env(|env, _| {
                env.get_static_field("android/os/Build$VERSION", "SDK_INT", "I")?
                    .i()
            })
            .host_err("Failed to read SDK_INT")?;
        debug!("Android SDK_INT: {}", sdk);
        Ok(sdk)
    }
}

/// `activity.getWindow().getDecorView()`
pub fn decor_view<'local>(
    env: &mut JNIEnv<'local>,
    activity: &JObject,
) -> jni::errors::Result<JObject<'local>> {
    let window = env
        .call_method(activity, "getWindow", "()Landroid/view/Window;", &[])?
        .l()?;
    env.call_method(&window, "getDecorView", "()Landroid/view/View;", &[])?
        .l()
}

/// Whether the calling thread runs the main looper
pub fn is_ui_thread(env: &mut JNIEnv) -> jni::errors::Result<bool> {
    let current = env
        .call_static_method("android/os/Looper", "myLooper", "()Landroid/os/Looper;", &[])?
        .l()?;
    let main = env
        .call_static_method(
            "android/os/Looper",
            "getMainLooper",
            "()Landroid/os/Looper;",
            &[],
        )?
        .l()?;
    env.is_same_object(&current, &main)
}

/// Whether `object`'s class declares or inherits method `name` with `sig`
///
/// A failed lookup leaves `NoSuchMethodError` pending; it is cleared here.
pub fn has_method(
    env: &mut JNIEnv,
    object: &JObject,
    name: &str,
    sig: &str,
) -> jni::errors::Result<bool> {
    let class = env.get_object_class(object)?;
    let found = env.get_method_id(&class, name, sig).is_ok();
    if env.exception_check()? {
        env.exception_clear()?;
    }
    Ok(found)
}

/// `context.getSystemService(Context.<field>)`, `None` if the service is absent
pub fn system_service<'local>(
    env: &mut JNIEnv<'local>,
    context: &JObject,
    field: &str,
) -> jni::errors::Result<Option<JObject<'local>>> {
    let name = env
        .get_static_field("android/content/Context", field, "Ljava/lang/String;")?
        .l()?;
    let service = env
        .call_method(
            context,
            "getSystemService",
            "(Ljava/lang/String;)Ljava/lang/Object;",
            &[JValue::Object(&name)],
        )?
        .l()?;

    if service.is_null() {
        warn!("System service {} not available", field);
        return Ok(None);
    }
    Ok(Some(service))
}

/// `activity.getApplicationContext()`
pub fn application_context<'local>(
    env: &mut JNIEnv<'local>,
    activity: &JObject,
) -> jni::errors::Result<JObject<'local>> {
    env.call_method(
        activity,
        "getApplicationContext",
        "()Landroid/content/Context;",
        &[],
    )?
    .l()
}
