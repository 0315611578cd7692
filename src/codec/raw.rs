// src/codec/raw.rs

//! Supermicro OEM raw command encoding
//!
//! Every OEM command is `netfn 0x30` followed by the command bytes, an
//! optional action byte and optional sub-command bytes, in that order.
//! Some commands deviate (hostname has no action byte, DDNS puts the
//! sub-command before the action); those resources compose the bytes
//! themselves from the same building blocks.

/// Network function byte for Supermicro OEM commands
pub const NETFN_OEM: u8 = 0x30;

/// Symbolic OEM command identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum OemCommand {
    Hostname,
    Ntp,
    Ddns,
    NetworkMode,
    IsActivated,
    SetLicense,
}

impl OemCommand {
    /// Command bytes following the netfn
    pub const fn bytes(&self) -> &'static [u8] {
        match self {
            Self::Hostname => &[0x47],
            Self::Ntp => &[0x68, 0x01],
            Self::Ddns => &[0x68, 0x04],
            Self::NetworkMode => &[0x70, 0x0c],
            Self::IsActivated => &[0x6a],
            Self::SetLicense => &[0x69],
        }
    }
}

/// Get/set action byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Get,
    Set,
}

impl Action {
    pub const fn byte(&self) -> u8 {
        match self {
            Self::Get => 0x00,
            Self::Set => 0x01,
        }
    }
}

/// Build `netfn + command + action? + sub`
pub fn build_command(command: OemCommand, action: Option<Action>, sub: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(1 + command.bytes().len() + 1 + sub.len());
    data.push(NETFN_OEM);
    data.extend_from_slice(command.bytes());
    if let Some(action) = action {
        data.push(action.byte());
    }
    data.extend_from_slice(sub);
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::bytes_to_string;

    #[test]
    fn test_component_order() {
        assert_eq!(
            build_command(OemCommand::Ntp, Some(Action::Get), &[0x01]),
            vec![0x30, 0x68, 0x01, 0x00, 0x01]
        );
        assert_eq!(
            build_command(OemCommand::NetworkMode, Some(Action::Set), &[0x02]),
            vec![0x30, 0x70, 0x0c, 0x01, 0x02]
        );
        assert_eq!(build_command(OemCommand::IsActivated, None, &[]), vec![0x30, 0x6a]);
    }

    #[test]
    fn test_hostname_payload_echo() {
        let data = build_command(OemCommand::Hostname, Some(Action::Set), b"myhost");
        assert_eq!(&data[..3], &[0x30, 0x47, 0x01]);
        assert_eq!(bytes_to_string(&data[3..]), "myhost");
    }

    #[test]
    fn test_command_names() {
        assert_eq!(OemCommand::NetworkMode.to_string(), "networkmode");
        assert_eq!(OemCommand::SetLicense.as_ref(), "setlicense");
    }
}
