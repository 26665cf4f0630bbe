use encounter_engine::{apply_command, CombatCommand, Encounter, TrackerConfig};
use jni::objects::{JClass, JString};
use jni::sys::{jlong, jstring};
use jni::JNIEnv;
use serde_json::json;

fn ok(env: &JNIEnv, value: serde_json::Value) -> jstring {
    let payload = json!({ "ok": true, "result": value });
    to_jstring(env, payload.to_string())
}

fn err(env: &JNIEnv, e: impl std::fmt::Display) -> jstring {
    let payload = json!({ "ok": false, "error": e.to_string() });
    to_jstring(env, payload.to_string())
}

fn to_jstring(env: &JNIEnv, s: String) -> jstring {
    match env.new_string(s) {
        Ok(js) => js.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

#[no_mangle]
pub extern "system" fn Java_com_encounter_Ffi_version<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jstring {
    to_jstring(&env, format!("encounter-ffi {}", env!("CARGO_PKG_VERSION")))
}

/// Applies one command to an encounter, both passed as JSON. A negative
/// seed rolls from OS entropy.
#[no_mangle]
pub extern "system" fn Java_com_encounter_Ffi_applyCommandJson(
    mut env: JNIEnv,
    _class: JClass,
    encounter_json: JString,
    command_json: JString,
    seed: jlong,
) -> jstring {
    let encounter: String = match env.get_string(&encounter_json) {
        Ok(s) => s.into(),
        Err(e) => return err(&env, e),
    };
    let command: String = match env.get_string(&command_json) {
        Ok(s) => s.into(),
        Err(e) => return err(&env, e),
    };
    let seed = u64::try_from(seed).ok();
    match apply_command_internal(&encounter, &command, seed) {
        Ok(value) => ok(&env, value),
        Err(e) => err(&env, e),
    }
}

// Internal functions for testing without JNI overhead
pub fn apply_command_internal(
    encounter_json: &str,
    command_json: &str,
    seed: Option<u64>,
) -> anyhow::Result<serde_json::Value> {
    let encounter: Encounter = serde_json::from_str(encounter_json)
        .map_err(|e| anyhow::anyhow!("invalid_encounter: {}", e))?;
    let command: CombatCommand = serde_json::from_str(command_json)
        .map_err(|e| anyhow::anyhow!("invalid_command: {}", e))?;
    let cfg = TrackerConfig { seed, ..TrackerConfig::default() };
    let mut dice = cfg.dice();
    let next = apply_command(&encounter, &command, &mut dice, &cfg, chrono::Utc::now())?;
    Ok(serde_json::to_value(next)?)
}
