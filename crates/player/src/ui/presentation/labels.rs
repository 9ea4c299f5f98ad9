//! Display strings for the terminal UI.
//!
//! Traditional Chinese is the default locale; English is the alternative.

use std::fmt;
use std::str::FromStr;

use wolfpack_domain::{Phase, Role};

use crate::application::policy::{AdvanceKind, NightAbility};
use crate::infrastructure::ConnectionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    ZhTw,
    En,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::ZhTw => "zh-TW",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "zh-tw" | "zh" | "zh-hant" => Ok(Locale::ZhTw),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

pub fn phase_label(locale: Locale, phase: Phase) -> &'static str {
    match (locale, phase) {
        (Locale::ZhTw, Phase::Setup) => "準備中",
        (Locale::ZhTw, Phase::Day) => "白天討論",
        (Locale::ZhTw, Phase::Vote) => "投票",
        (Locale::ZhTw, Phase::Night) => "夜晚",
        (Locale::ZhTw, Phase::GameOver) => "遊戲結束",
        (Locale::En, Phase::Setup) => "Setup",
        (Locale::En, Phase::Day) => "Day discussion",
        (Locale::En, Phase::Vote) => "Vote",
        (Locale::En, Phase::Night) => "Night",
        (Locale::En, Phase::GameOver) => "Game over",
    }
}

pub fn day_label(locale: Locale, day: u32) -> String {
    match locale {
        Locale::ZhTw => format!("第{day}天"),
        Locale::En => format!("Day {day}"),
    }
}

/// `None` renders as "unknown".
pub fn role_label(locale: Locale, role: Option<Role>) -> &'static str {
    match (locale, role) {
        (Locale::ZhTw, Some(Role::Villager)) => "村民",
        (Locale::ZhTw, Some(Role::Seer)) => "預言家",
        (Locale::ZhTw, Some(Role::Werewolf)) => "狼人",
        (Locale::ZhTw, Some(Role::Observer)) => "觀察者",
        (Locale::ZhTw, None) => "未知",
        (Locale::En, Some(Role::Villager)) => "villager",
        (Locale::En, Some(Role::Seer)) => "seer",
        (Locale::En, Some(Role::Werewolf)) => "werewolf",
        (Locale::En, Some(Role::Observer)) => "observer",
        (Locale::En, None) => "unknown",
    }
}

pub fn life_label(locale: Locale, is_alive: bool) -> &'static str {
    match (locale, is_alive) {
        (Locale::ZhTw, true) => "存活",
        (Locale::ZhTw, false) => "死亡",
        (Locale::En, true) => "alive",
        (Locale::En, false) => "dead",
    }
}

pub fn self_marker(locale: Locale) -> &'static str {
    match locale {
        Locale::ZhTw => "（你）",
        Locale::En => " (you)",
    }
}

pub fn advance_label(locale: Locale, kind: AdvanceKind) -> &'static str {
    match (locale, kind) {
        (Locale::ZhTw, AdvanceKind::EndDiscussion) => "結束討論，進入投票",
        (Locale::ZhTw, AdvanceKind::NextPhase) => "下一階段",
        (Locale::ZhTw, AdvanceKind::GameEnded) => "遊戲已結束",
        (Locale::En, AdvanceKind::EndDiscussion) => "End discussion, proceed to vote",
        (Locale::En, AdvanceKind::NextPhase) => "Next phase",
        (Locale::En, AdvanceKind::GameEnded) => "Game has ended",
    }
}

pub fn vote_prompt(locale: Locale) -> &'static str {
    match locale {
        Locale::ZhTw => "選擇要放逐的玩家",
        Locale::En => "Choose a player to banish",
    }
}

pub fn night_prompt(locale: Locale, ability: NightAbility) -> &'static str {
    match (locale, ability) {
        (Locale::ZhTw, NightAbility::Kill) => "選擇今晚要殺害的玩家",
        (Locale::ZhTw, NightAbility::Inspect) => "選擇今晚要查驗的玩家",
        (Locale::ZhTw, NightAbility::NoAbility) => "你今晚沒有行動，請等待天亮",
        (Locale::En, NightAbility::Kill) => "Choose tonight's victim",
        (Locale::En, NightAbility::Inspect) => "Choose a player to inspect",
        (Locale::En, NightAbility::NoAbility) => "You have no action tonight; wait for dawn",
    }
}

pub fn winner_text(locale: Locale, winner: Option<&str>) -> String {
    match (locale, winner) {
        (Locale::ZhTw, Some(winner)) => format!("{winner}獲勝！"),
        (Locale::ZhTw, None) => "遊戲結束".to_string(),
        (Locale::En, Some(winner)) => format!("{winner} wins!"),
        (Locale::En, None) => "The game is over".to_string(),
    }
}

pub fn alive_summary(locale: Locale, alive: usize, total: usize) -> String {
    match locale {
        Locale::ZhTw => format!("存活 {alive}/{total}"),
        Locale::En => format!("{alive}/{total} alive"),
    }
}

pub fn deaths_heading(locale: Locale) -> &'static str {
    match locale {
        Locale::ZhTw => "昨晚死亡",
        Locale::En => "Died last night",
    }
}

pub fn peaceful_night(locale: Locale) -> &'static str {
    match locale {
        Locale::ZhTw => "昨晚是平安夜",
        Locale::En => "Nobody died last night",
    }
}

/// Notice for a push-channel state change, if the user should hear about it.
/// `previous` is the last state that was worth a notice (or `Disconnected`).
pub fn connection_notice(
    locale: Locale,
    previous: ConnectionState,
    current: ConnectionState,
) -> Option<&'static str> {
    let text = match (locale, current) {
        (Locale::ZhTw, ConnectionState::Reconnecting) => "連線中斷，正在重新連線…",
        (Locale::ZhTw, ConnectionState::Failed) => "無法連線到推播伺服器，改用定時更新",
        (Locale::ZhTw, ConnectionState::Connected) => "已重新連線",
        (Locale::En, ConnectionState::Reconnecting) => "Push channel lost, reconnecting",
        (Locale::En, ConnectionState::Failed) => {
            "Push channel unavailable; relying on scheduled refresh"
        }
        (Locale::En, ConnectionState::Connected) => "Push channel reconnected",
        (_, ConnectionState::Disconnected | ConnectionState::Connecting) => return None,
    };
    match (previous, current) {
        (p, c) if p == c => None,
        // The first connection is not news.
        (ConnectionState::Disconnected, ConnectionState::Connected) => None,
        _ => Some(text),
    }
}

/// "name（role）" in Chinese, "name (role)" in English.
pub fn name_with_role(locale: Locale, name: &str, role: Option<Role>) -> String {
    match locale {
        Locale::ZhTw => format!("{name}（{}）", role_label(locale, role)),
        Locale::En => format!("{name} ({})", role_label(locale, role)),
    }
}
