//! ユーザー設定と localStorage への保存/読み込み。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 現在の保存形式バージョン。フィールド追加時にインクリメントする。
//! - `MIN_COMPATIBLE_VERSION`: 読み込める最小バージョン。
//!   フィールドの意味変更や削除を行った場合のみインクリメントする。
//!
//! 不足フィールドは `#[serde(default)]` で既定値に補完される。

use serde::{Deserialize, Serialize};

use crate::games::prime::level;

/// 保存形式のバージョン。
const SAVE_VERSION: u32 = 1;

/// 互換性を維持できる最小バージョン。
const MIN_COMPATIBLE_VERSION: u32 = 1;

/// localStorage のキー。
#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "prime_product_game_settings";

pub const OBSERVE_INTERVAL_MIN: u32 = 5;
pub const OBSERVE_INTERVAL_MAX: u32 = 100;

/// Player-facing settings, passed explicitly to each game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Selected level number.
    pub level: u32,
    /// Each prime pick divides immediately instead of waiting for submit.
    pub instant_divide: bool,
    /// Delay before the next round after a completed one; 0 turns it off.
    pub auto_advance_secs: u32,
    /// Ticks between rounds in observation mode.
    pub observe_interval_ticks: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: 1,
            instant_divide: false,
            auto_advance_secs: 3,
            observe_interval_ticks: 15,
        }
    }
}

impl Settings {
    /// Repair values a stale or hand-edited blob may carry.
    pub fn sanitized(mut self) -> Self {
        if level::level(self.level).is_none() {
            self.level = Settings::default().level;
        }
        self.observe_interval_ticks = self
            .observe_interval_ticks
            .clamp(OBSERVE_INTERVAL_MIN, OBSERVE_INTERVAL_MAX);
        self
    }
}

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    settings: Settings,
}

fn to_json(settings: &Settings) -> Result<String, serde_json::Error> {
    serde_json::to_string(&SaveData {
        version: SAVE_VERSION,
        settings: settings.clone(),
    })
}

/// Parse a stored blob. `None` when it is unreadable or too old.
fn from_json(json: &str) -> Option<Settings> {
    let data: SaveData = match serde_json::from_str(json) {
        Ok(d) => d,
        Err(e) => {
            crate::log::warn(&format!("[settings] 設定データのパースに失敗（破棄します）: {e}"));
            return None;
        }
    };
    if data.version < MIN_COMPATIBLE_VERSION {
        crate::log::info(&format!(
            "[settings] 設定バージョンが古すぎます (saved={}, min_compatible={})",
            data.version, MIN_COMPATIBLE_VERSION
        ));
        return None;
    }
    if data.version < SAVE_VERSION {
        crate::log::info(&format!(
            "[settings] 旧バージョンの設定をマイグレーション (saved={}, current={})",
            data.version, SAVE_VERSION
        ));
    }
    Some(data.settings.sanitized())
}

#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// 設定を localStorage に保存する。失敗はログに残して無視する。
#[cfg(target_arch = "wasm32")]
pub fn save(settings: &Settings) {
    let json = match to_json(settings) {
        Ok(j) => j,
        Err(e) => {
            crate::log::warn(&format!("[settings] シリアライズに失敗: {e}"));
            return;
        }
    };
    if let Some(storage) = get_storage() {
        if let Err(e) = storage.set_item(STORAGE_KEY, &json) {
            crate::log::warn(&format!("[settings] localStorage への保存に失敗: {e:?}"));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save(_settings: &Settings) {}

/// localStorage から設定を読み込む。無い・壊れている場合は既定値。
#[cfg(target_arch = "wasm32")]
pub fn load() -> Settings {
    let Some(storage) = get_storage() else {
        return Settings::default();
    };
    let json = match storage.get_item(STORAGE_KEY) {
        Ok(Some(j)) => j,
        _ => return Settings::default(),
    };
    match from_json(&json) {
        Some(settings) => settings,
        None => {
            let _ = storage.remove_item(STORAGE_KEY);
            Settings::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load() -> Settings {
    Settings::default()
}
