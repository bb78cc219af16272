// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn default_strategy_is_500ms_debounce() {
    assert_eq!(FlushStrategy::default(), FlushStrategy::Debounce { delay_ms: 500 });
}

#[test]
fn default_config_uses_window_state_json() {
    let config = StateKeeperConfig::default();
    assert_eq!(config.path, std::path::PathBuf::from("window-state.json"));
}

#[test]
fn strategy_round_trips_through_serde() {
    let strategy = FlushStrategy::Throttle { delay_ms: 250 };
    let json = serde_json::to_value(strategy).unwrap();
    let back: FlushStrategy = serde_json::from_value(json).unwrap();
    assert_eq!(strategy, back);
}
