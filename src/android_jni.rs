//! JNI bindings for the Android app.
//!
//! Each public function here corresponds to an `external fun` declaration
//! in RustBridge.kt. The function names follow JNI naming conventions:
//! Java_<package>_<class>_<method> with dots replaced by underscores.
//!
//! The Kotlin side owns the platform location calls and pushes their
//! results in. It keeps the screen alive through the opaque handle
//! returned by `create` and must call `destroy` exactly once. All calls
//! arrive on the UI thread.

use std::ptr;

use chrono::Local;
use jni::JNIEnv;
use jni::objects::{JClass, JString};
use jni::sys::{jboolean, jdouble, jlong, jstring, JNI_FALSE};
use log::{debug, error};

use crate::config::Config;
use crate::location::{Coordinate, Permission};
use crate::screen::Screen;
use crate::Error;

const ILLEGAL_STATE: &str = "java/lang/IllegalStateException";
const ILLEGAL_ARGUMENT: &str = "java/lang/IllegalArgumentException";

fn init_logging() {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("tripmeter"),
    );
}

fn throw(env: &mut JNIEnv, class: &str, message: &str) {
    error!("{message}");
    if let Err(e) = env.throw_new(class, message) {
        error!("failed to throw {class}: {e}");
    }
}

fn to_jstring(env: &mut JNIEnv, value: &str) -> jstring {
    match env.new_string(value) {
        Ok(s) => s.into_raw(),
        Err(e) => {
            error!("failed to create Java string: {e}");
            ptr::null_mut()
        }
    }
}

/// # Safety
///
/// `handle` must be zero or a value returned by `create` that has not
/// been passed to `destroy`.
unsafe fn screen_mut<'a>(handle: jlong) -> Option<&'a mut Screen> {
    unsafe { (handle as *mut Screen).as_mut() }
}

/// Apply `event` to the screen behind `handle` and return the new view.
fn with_screen(env: &mut JNIEnv, handle: jlong, event: impl FnOnce(&mut Screen)) -> jstring {
    // SAFETY: the Kotlin side only passes handles it got from `create`.
    let Some(screen) = (unsafe { screen_mut(handle) }) else {
        throw(env, ILLEGAL_STATE, "screen handle is null");
        return ptr::null_mut();
    };

    event(screen);

    match screen.view_json() {
        Ok(json) => to_jstring(env, &json),
        Err(e) => {
            throw(env, ILLEGAL_STATE, &format!("failed to render screen: {e}"));
            ptr::null_mut()
        }
    }
}

/// Returns the rust-core library version.
/// Maps to: RustBridge.version() -> String
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tripmeter_app_RustBridge_version(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    to_jstring(&mut env, crate::VERSION)
}

/// Creates a screen in the loading phase.
/// Maps to: RustBridge.create(configJson: String) -> Long
///
/// Returns 0 and throws IllegalArgumentException on a bad config.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tripmeter_app_RustBridge_create(
    mut env: JNIEnv,
    _class: JClass,
    config_json: JString,
) -> jlong {
    init_logging();

    let json: String = match env.get_string(&config_json) {
        Ok(s) => s.into(),
        Err(e) => {
            throw(&mut env, ILLEGAL_ARGUMENT, &format!("unreadable config string: {e}"));
            return 0;
        }
    };

    match Config::from_json(&json) {
        Ok(config) => {
            debug!("creating screen with {config:?}");
            Box::into_raw(Box::new(Screen::new(config))) as jlong
        }
        Err(e) => {
            throw(&mut env, ILLEGAL_ARGUMENT, &e.to_string());
            0
        }
    }
}

/// Frees the screen behind `handle`.
/// Maps to: RustBridge.destroy(handle: Long)
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tripmeter_app_RustBridge_destroy(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    if handle == 0 {
        return;
    }
    // SAFETY: `handle` came from Box::into_raw in `create` and is
    // destroyed once.
    drop(unsafe { Box::from_raw(handle as *mut Screen) });
    debug!("screen destroyed");
}

/// Result of the foreground permission prompt.
/// Maps to: RustBridge.onPermission(handle: Long, granted: Boolean) -> String
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tripmeter_app_RustBridge_onPermission(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    granted: jboolean,
) -> jstring {
    let permission = if granted == JNI_FALSE {
        Permission::Denied
    } else {
        Permission::Granted
    };
    with_screen(&mut env, handle, |screen| screen.permission_resolved(permission))
}

/// Launch-time position fix.
/// Maps to: RustBridge.onLocation(handle: Long, lat: Double, lon: Double) -> String
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tripmeter_app_RustBridge_onLocation(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    lat: jdouble,
    lon: jdouble,
) -> jstring {
    let reading = Coordinate::checked(lat, lon);
    with_screen(&mut env, handle, |screen| screen.location_resolved(reading))
}

/// The launch-time position fetch failed.
/// Maps to: RustBridge.onLocationUnavailable(handle: Long) -> String
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tripmeter_app_RustBridge_onLocationUnavailable(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jstring {
    with_screen(&mut env, handle, |screen| {
        screen.location_resolved(Err(Error::CoordinateUnavailable))
    })
}

/// Toggle button tap with the reading taken for it.
/// Maps to: RustBridge.press(handle: Long, hasFix: Boolean, lat: Double, lon: Double) -> String
///
/// A refused toggle is not an exception: the returned view simply
/// shows the unchanged state.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tripmeter_app_RustBridge_press(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    has_fix: jboolean,
    lat: jdouble,
    lon: jdouble,
) -> jstring {
    let reading = if has_fix == JNI_FALSE {
        None
    } else {
        match Coordinate::checked(lat, lon) {
            Ok(c) => Some(c),
            Err(e) => {
                throw(&mut env, ILLEGAL_ARGUMENT, &e.to_string());
                return ptr::null_mut();
            }
        }
    };

    with_screen(&mut env, handle, |screen| {
        match screen.press(reading, Local::now()) {
            Ok(transition) => debug!("press: {transition:?}"),
            Err(e) => debug!("press refused: {e}"),
        }
    })
}

/// Current view without any state change.
/// Maps to: RustBridge.view(handle: Long) -> String
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tripmeter_app_RustBridge_view(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jstring {
    with_screen(&mut env, handle, |_| {})
}
