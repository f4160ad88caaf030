use std::borrow::Cow;

use fitparser::profile::MesgNum;

/// Message kinds the pipeline knows by name. Anything else travels as
/// [`MessageKind::Other`] with its global message number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    FileId,
    FileCreator,
    Event,
    DeviceInfo,
    UserProfile,
    Sport,
    Session,
    Lap,
    Record,
    Activity,
    Hrv,
    FieldDescription,
    DeveloperDataId,
    Other(u16),
}

/// Reviewed name table: canonical profile name, collection name, kind.
const KNOWN_KINDS: [(&str, &str, MessageKind); 13] = [
    ("FILE_ID", "fileIdMesgs", MessageKind::FileId),
    ("FILE_CREATOR", "fileCreatorMesgs", MessageKind::FileCreator),
    ("EVENT", "eventMesgs", MessageKind::Event),
    ("DEVICE_INFO", "deviceInfoMesgs", MessageKind::DeviceInfo),
    ("USER_PROFILE", "userProfileMesgs", MessageKind::UserProfile),
    ("SPORT", "sportMesgs", MessageKind::Sport),
    ("SESSION", "sessionMesgs", MessageKind::Session),
    ("LAP", "lapMesgs", MessageKind::Lap),
    ("RECORD", "recordMesgs", MessageKind::Record),
    ("ACTIVITY", "activityMesgs", MessageKind::Activity),
    ("HRV", "hrvMesgs", MessageKind::Hrv),
    (
        "FIELD_DESCRIPTION",
        "fieldDescriptionMesgs",
        MessageKind::FieldDescription,
    ),
    (
        "DEVELOPER_DATA_ID",
        "developerDataIdMesgs",
        MessageKind::DeveloperDataId,
    ),
];

impl MessageKind {
    pub fn from_mesg_num(mesg_num: u16) -> Self {
        KNOWN_KINDS
            .iter()
            .map(|(_, _, kind)| *kind)
            .find(|kind| kind.mesg_num() == mesg_num)
            .unwrap_or(MessageKind::Other(mesg_num))
    }

    /// Global message number from the FIT profile.
    pub fn mesg_num(self) -> u16 {
        let profile = match self {
            MessageKind::FileId => MesgNum::FileId,
            MessageKind::FileCreator => MesgNum::FileCreator,
            MessageKind::Event => MesgNum::Event,
            MessageKind::DeviceInfo => MesgNum::DeviceInfo,
            MessageKind::UserProfile => MesgNum::UserProfile,
            MessageKind::Sport => MesgNum::Sport,
            MessageKind::Session => MesgNum::Session,
            MessageKind::Lap => MesgNum::Lap,
            MessageKind::Record => MesgNum::Record,
            MessageKind::Activity => MesgNum::Activity,
            MessageKind::Hrv => MesgNum::Hrv,
            MessageKind::FieldDescription => MesgNum::FieldDescription,
            MessageKind::DeveloperDataId => MesgNum::DeveloperDataId,
            MessageKind::Other(mesg_num) => return mesg_num,
        };
        profile.as_u16()
    }

    /// Resolve a collection name such as `recordMesgs` through the name table.
    pub fn from_collection_name(collection: &str) -> Option<Self> {
        let canonical = canonical_name(collection);
        KNOWN_KINDS
            .iter()
            .find(|(name, _, _)| *name == canonical)
            .map(|(_, _, kind)| *kind)
    }

    pub fn collection_name(self) -> Cow<'static, str> {
        match KNOWN_KINDS.iter().find(|(_, _, kind)| *kind == self) {
            Some((_, collection, _)) => Cow::Borrowed(*collection),
            None => Cow::Owned(format!("mesg{}Mesgs", self.mesg_num())),
        }
    }
}

/// Canonicalize a collection name: drop a trailing `Mesgs`, split camel case
/// with underscores and uppercase (`deviceInfoMesgs` -> `DEVICE_INFO`).
pub fn canonical_name(collection: &str) -> String {
    let stem = collection.strip_suffix("Mesgs").unwrap_or(collection);
    let mut canonical = String::with_capacity(stem.len() + 4);
    let mut previous_lowercase = false;

    for ch in stem.chars() {
        if previous_lowercase && ch.is_ascii_uppercase() {
            canonical.push('_');
        }
        previous_lowercase = ch.is_ascii_lowercase();
        canonical.push(ch.to_ascii_uppercase());
    }

    canonical
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_kinds_use_profile_numbers() {
        assert_eq!(MessageKind::Session.mesg_num(), 18);
        assert_eq!(MessageKind::Lap.mesg_num(), 19);
        assert_eq!(MessageKind::Record.mesg_num(), 20);
        assert_eq!(MessageKind::Event.mesg_num(), 21);
    }

    #[test]
    fn mesg_numbers_round_trip() {
        for (_, _, kind) in KNOWN_KINDS {
            assert_eq!(MessageKind::from_mesg_num(kind.mesg_num()), kind);
        }
        assert_eq!(MessageKind::from_mesg_num(65280), MessageKind::Other(65280));
        assert_eq!(MessageKind::Other(65280).mesg_num(), 65280);
    }

    #[test]
    fn canonical_names_follow_profile_spelling() {
        assert_eq!(canonical_name("recordMesgs"), "RECORD");
        assert_eq!(canonical_name("deviceInfoMesgs"), "DEVICE_INFO");
        assert_eq!(canonical_name("developerDataIdMesgs"), "DEVELOPER_DATA_ID");
        assert_eq!(canonical_name("hrv"), "HRV");
    }

    #[test]
    fn collection_names_resolve_through_the_table() {
        assert_eq!(
            MessageKind::from_collection_name("sessionMesgs"),
            Some(MessageKind::Session)
        );
        assert_eq!(
            MessageKind::from_collection_name("fileIdMesgs"),
            Some(MessageKind::FileId)
        );
        assert_eq!(MessageKind::from_collection_name("madeUpMesgs"), None);
        for (_, collection, kind) in KNOWN_KINDS {
            assert_eq!(MessageKind::from_collection_name(collection), Some(kind));
            assert_eq!(kind.collection_name(), collection);
        }
    }
}
