//! Android host window
//!
//! Implements [`HostWindow`] over the activity's decor view, the
//! `InputMethodManager` and `WindowInsets` through JNI. Every operation is
//! fire-and-forget: failures and Java exceptions are logged and swallowed.
//!
//! # UI thread
//!
//! `android_main` does not run on the Java UI thread, and the view hierarchy
//! rejects `setSystemUiVisibility` from any other thread. Off the UI thread
//! the flags are handed to the activity's [`UI_THREAD_HOOK`] method, which
//! the scaffolding activity implements by posting to its UI thread:
//!
//! ```java
//! public void octaveSetSystemUiVisibility(final int flags) {
//!     runOnUiThread(() -> getWindow().getDecorView().setSystemUiVisibility(flags));
//! }
//! ```
//!
//! Without that method chrome flags are only applied when called on the UI
//! thread; otherwise they are reported as not applied and the bridge keeps
//! its previous chrome state.

use std::rc::Rc;

use jni::objects::{JObject, JValue};
use jni::JNIEnv;

use octave_host::{ChromeFlags, HostWindow, ScreenOrientation};

use tracing::{debug, warn};

use crate::jni_utils::{decor_view, has_method, is_ui_thread, system_service, JniContext};

/// Activity method that applies system UI flags on the UI thread
pub const UI_THREAD_HOOK: &str = "octaveSetSystemUiVisibility";

/// `InputMethodManager.SHOW_FORCED`
const SHOW_FORCED: i32 = 2;

/// First API level with `WindowInsets.Type.ime()`
const IME_INSETS_API_LEVEL: i32 = 30;

/// Android window backed by the activity's decor view
pub struct AndroidHostWindow {
    ctx: Rc<JniContext>,
    api_level: i32,
    ui_thread_hook: bool,
}

impl AndroidHostWindow {
    /// Create a window over the activity held by `ctx`
    pub fn new(ctx: Rc<JniContext>, api_level: i32) -> Self {
        let ui_thread_hook = ctx
            .with_env(|env, activity| has_method(env, activity, UI_THREAD_HOOK, "(I)V"))
            .unwrap_or_else(|e| {
                warn!("Failed to look up {}: {:?}", UI_THREAD_HOOK, e);
                false
            });
        if !ui_thread_hook {
            warn!(
                "Activity has no {}(int); chrome flags only apply on the UI thread",
                UI_THREAD_HOOK
            );
        }

        Self {
            ctx,
            api_level,
            ui_thread_hook,
        }
    }

    /// Whether the activity can apply chrome flags on its UI thread for us
    pub fn has_ui_thread_hook(&self) -> bool {
        self.ui_thread_hook
    }

    /// Device API level this window was created for
    pub fn api_level(&self) -> i32 {
        self.api_level
    }

    /// Current system UI visibility mask of the decor view
    pub fn system_ui_visibility(&self) -> u32 {
        self.ctx
            .with_env(|env, activity| {
                let decor = decor_view(env, activity)?;
                env.call_method(&decor, "getSystemUiVisibility", "()I", &[])?
                    .i()
            })
            .map(|mask| mask as u32)
            .unwrap_or_else(|e| {
                warn!("Failed to read system UI visibility: {:?}", e);
                0
            })
    }

    fn input_method_manager<'local>(
        env: &mut JNIEnv<'local>,
        activity: &JObject,
    ) -> jni::errors::Result<Option<JObject<'local>>> {
        system_service(env, activity, "INPUT_METHOD_SERVICE")
    }

    fn root_insets<'local>(
        env: &mut JNIEnv<'local>,
        activity: &JObject,
    ) -> jni::errors::Result<Option<JObject<'local>>> {
        let decor = decor_view(env, activity)?;
        let insets = env
            .call_method(
                &decor,
                "getRootWindowInsets",
                "()Landroid/view/WindowInsets;",
                &[],
            )?
            .l()?;
        Ok((!insets.is_null()).then_some(insets))
    }

    fn ime_type(env: &mut JNIEnv) -> jni::errors::Result<i32> {
        env.call_static_method("android/view/WindowInsets$Type", "ime", "()I", &[])?
            .i()
    }

    /// Bottom inset attributed to the keyboard
    ///
    /// Before API 30 there is no IME inset type; the keyboard shows up as the
    /// gap between the system window inset and the stable inset.
    fn ime_bottom(&self) -> jni::errors::Result<i32> {
        let api_level = self.api_level;
        self.ctx.with_env(|env, activity| {
            let Some(insets) = Self::root_insets(env, activity)? else {
                return Ok(0);
            };

            if api_level >= IME_INSETS_API_LEVEL {
                let ime = Self::ime_type(env)?;
                let ime_insets = env
                    .call_method(
                        &insets,
                        "getInsets",
                        "(I)Landroid/graphics/Insets;",
                        &[JValue::Int(ime)],
                    )?
                    .l()?;
                return env.get_field(&ime_insets, "bottom", "I")?.i();
            }

            let system = env
                .call_method(&insets, "getSystemWindowInsetBottom", "()I", &[])?
                .i()?;
            let stable = env
                .call_method(&insets, "getStableInsetBottom", "()I", &[])?
                .i()?;
            Ok((system - stable).max(0))
        })
    }
}

impl HostWindow for AndroidHostWindow {
    fn set_system_ui_visibility(&self, flags: ChromeFlags) -> bool {
        let raw = flags.bits() as i32;
        let result = self.ctx.with_env(|env, activity| {
            if is_ui_thread(env)? {
                let decor = decor_view(env, activity)?;
                env.call_method(&decor, "setSystemUiVisibility", "(I)V", &[JValue::Int(raw)])?;
                return Ok(true);
            }
            if self.ui_thread_hook {
                env.call_method(activity, UI_THREAD_HOOK, "(I)V", &[JValue::Int(raw)])?;
                return Ok(true);
            }
            Ok(false)
        });
        match result {
            Ok(true) => {
                debug!("System UI visibility set to {:#x}", flags.bits());
                true
            }
            Ok(false) => {
                warn!(
                    "System UI visibility {:#x} dropped: not on the UI thread and no {} hook",
                    flags.bits(),
                    UI_THREAD_HOOK
                );
                false
            }
            Err(e) => {
                warn!("Failed to set system UI visibility: {:?}", e);
                false
            }
        }
    }

    fn set_requested_orientation(&self, orientation: ScreenOrientation) {
        let result = self.ctx.with_env(|env, activity| {
            env.call_method(
                activity,
                "setRequestedOrientation",
                "(I)V",
                &[JValue::Int(orientation.as_raw())],
            )?;
            Ok(())
        });
        if let Err(e) = result {
            warn!("Failed to set requested orientation: {:?}", e);
        }
    }

    fn show_soft_input(&self) {
        let result = self.ctx.with_env(|env, activity| {
            let Some(imm) = Self::input_method_manager(env, activity)? else {
                return Ok(());
            };
            let decor = decor_view(env, activity)?;
            env.call_method(
                &imm,
                "showSoftInput",
                "(Landroid/view/View;I)Z",
                &[JValue::Object(&decor), JValue::Int(SHOW_FORCED)],
            )?;
            Ok(())
        });
        // showSoftInput can throw while the keyboard is animating open/closed
        if let Err(e) = result {
            warn!("Failed to show soft keyboard: {:?}", e);
        }
    }

    fn hide_soft_input(&self) {
        let result = self.ctx.with_env(|env, activity| {
            let Some(imm) = Self::input_method_manager(env, activity)? else {
                return Ok(());
            };
            let decor = decor_view(env, activity)?;
            let token = env
                .call_method(&decor, "getWindowToken", "()Landroid/os/IBinder;", &[])?
                .l()?;
            env.call_method(
                &imm,
                "hideSoftInputFromWindow",
                "(Landroid/os/IBinder;I)Z",
                &[JValue::Object(&token), JValue::Int(0)],
            )?;
            Ok(())
        });
        if let Err(e) = result {
            warn!("Failed to hide soft keyboard: {:?}", e);
        }
    }

    fn is_ime_visible(&self) -> bool {
        if self.api_level < IME_INSETS_API_LEVEL {
            return self.ime_inset_bottom() > 0;
        }

        self.ctx
            .with_env(|env, activity| {
                let Some(insets) = Self::root_insets(env, activity)? else {
                    return Ok(false);
                };
                let ime = Self::ime_type(env)?;
                env.call_method(&insets, "isVisible", "(I)Z", &[JValue::Int(ime)])?
                    .z()
            })
            .unwrap_or_else(|e| {
                warn!("Failed to query keyboard visibility: {:?}", e);
                false
            })
    }

    fn ime_inset_bottom(&self) -> u32 {
        self.ime_bottom()
            .map(|bottom| bottom.max(0) as u32)
            .unwrap_or_else(|e| {
                warn!("Failed to query keyboard inset: {:?}", e);
                0
            })
    }
}
