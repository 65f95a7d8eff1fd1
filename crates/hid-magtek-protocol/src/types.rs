//! Typed values decoded from device responses.
//!
//! These enums mirror the raw byte values the reader returns; every decoder
//! keeps an `Unknown` fallback so an unrecognized firmware value is carried
//! through rather than rejected.

/// Per-track enablement reported by the track id enable property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    #[default]
    Disabled,
    Enabled,
    EnabledRequired,
    Unknown,
}

impl TrackState {
    pub fn from_bits(val: u8) -> Self {
        match val {
            0 => Self::Disabled,
            1 => Self::Enabled,
            2 => Self::EnabledRequired,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Enabled => "enabled",
            Self::EnabledRequired => "enabled/required",
            Self::Unknown => "unknown",
        }
    }
}

/// Decoded track id enable property byte.
///
/// Bit 7 flags AAMVA support; bits 0-5 carry the three per-track states,
/// two bits each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackIdEnable {
    pub aamva_supported: bool,
    pub track_1: TrackState,
    pub track_2: TrackState,
    pub track_3: TrackState,
}

impl TrackIdEnable {
    pub fn from_byte(val: u8) -> Self {
        Self {
            aamva_supported: val & 0b1000_0000 != 0,
            track_1: TrackState::from_bits(val & 0b0000_0011),
            track_2: TrackState::from_bits((val & 0b0000_1100) >> 2),
            track_3: TrackState::from_bits((val & 0b0011_0000) >> 4),
        }
    }
}

/// Reader authentication state machine position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    WaitActivateAuthentication,
    WaitActivationReply,
    WaitSwipe,
    WaitDelay,
    Unknown,
}

impl ReaderState {
    pub fn from_u8(val: u8) -> Self {
        match val {
            0 => Self::WaitActivateAuthentication,
            1 => Self::WaitActivationReply,
            2 => Self::WaitSwipe,
            3 => Self::WaitDelay,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::WaitActivateAuthentication => "waiting to activate authentication",
            Self::WaitActivationReply => "waiting for activation challenge reply",
            Self::WaitSwipe => "waiting for swipe",
            Self::WaitDelay => "waiting for anti-hacking timer",
            Self::Unknown => "unknown",
        }
    }
}

/// Event that led the reader into its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderStateAntecedent {
    PoweredUp,
    GoodAuthentication,
    GoodSwipe,
    BadSwipe,
    FailedAuthentication,
    FailedDeactivation,
    TimedOutAuthentication,
    TimedOutSwipe,
    KeySyncError,
    Unknown,
}

impl ReaderStateAntecedent {
    pub fn from_u8(val: u8) -> Self {
        match val {
            0 => Self::PoweredUp,
            1 => Self::GoodAuthentication,
            2 => Self::GoodSwipe,
            3 => Self::BadSwipe,
            4 => Self::FailedAuthentication,
            5 => Self::FailedDeactivation,
            6 => Self::TimedOutAuthentication,
            7 => Self::TimedOutSwipe,
            8 => Self::KeySyncError,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PoweredUp => "powered up",
            Self::GoodAuthentication => "good authentication",
            Self::GoodSwipe => "good swipe",
            Self::BadSwipe => "bad swipe",
            Self::FailedAuthentication => "failed authentication",
            Self::FailedDeactivation => "failed deactivation",
            Self::TimedOutAuthentication => "authentication timed out",
            Self::TimedOutSwipe => "swipe timed out",
            Self::KeySyncError => "key sync error",
            Self::Unknown => "unknown",
        }
    }
}

/// Card encode type reported in a swipe report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEncodeType {
    IsoAba,
    Aamva,
    Reserved,
    Blank,
    Other,
    Undetermined,
    None,
    Unknown,
}

impl CardEncodeType {
    pub fn from_u8(val: u8) -> Self {
        match val {
            0 => Self::IsoAba,
            1 => Self::Aamva,
            2 => Self::Reserved,
            3 => Self::Blank,
            4 => Self::Other,
            5 => Self::Undetermined,
            6 => Self::None,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::IsoAba => "ISO/ABA",
            Self::Aamva => "AAMVA",
            Self::Reserved => "reserved",
            Self::Blank => "blank",
            Self::Other => "other",
            Self::Undetermined => "undetermined",
            Self::None => "none",
            Self::Unknown => "unknown",
        }
    }
}

/// Reader security level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityLevel {
    Level2,
    Level3,
    Level4,
    Unknown,
}

impl SecurityLevel {
    pub fn from_u8(val: u8) -> Self {
        match val {
            2 => Self::Level2,
            3 => Self::Level3,
            4 => Self::Level4,
            _ => Self::Unknown,
        }
    }
}
