//! Static crisis and support contacts.

use serde::Serialize;

/// Kind of service a contact provides.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    /// Emergency services.
    Emergency,
    /// Crisis lines.
    Crisis,
    /// Referral and information services.
    Support,
}

/// A single contact.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct EmergencyContact {
    /// Stable id.
    pub id: u32,
    /// Display name.
    pub name: &'static str,
    /// Phone number or texting instruction.
    pub number: &'static str,
    /// Contact kind, serialized as `type`.
    #[serde(rename = "type")]
    pub kind: ContactKind,
    /// One-line description.
    pub description: &'static str,
}

const CONTACTS: [EmergencyContact; 4] = [
    EmergencyContact {
        id: 1,
        name: "Emergency Helpline",
        number: "911",
        kind: ContactKind::Emergency,
        description: "For immediate emergency assistance",
    },
    EmergencyContact {
        id: 2,
        name: "National Suicide Prevention Lifeline",
        number: "1-800-273-8255",
        kind: ContactKind::Crisis,
        description: "24/7 crisis support and suicide prevention",
    },
    EmergencyContact {
        id: 3,
        name: "Crisis Text Line",
        number: "Text HOME to 741741",
        kind: ContactKind::Crisis,
        description: "Text-based crisis support",
    },
    EmergencyContact {
        id: 4,
        name: "SAMHSA's National Helpline",
        number: "1-800-662-4357",
        kind: ContactKind::Support,
        description: "Treatment referral and information service",
    },
];

/// The fixed contact table.
#[must_use]
pub const fn contacts() -> &'static [EmergencyContact] {
    &CONTACTS
}
