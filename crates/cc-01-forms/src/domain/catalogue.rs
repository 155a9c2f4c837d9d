//! # Closed Catalogues
//!
//! The issue vocabulary and the service-detail schemas. Both are fixed at
//! compile time; there is no runtime registration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One structured question that may be embedded in a description as
/// `<detail> {<option>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDetail {
    /// The question text, e.g. `pothole location`.
    pub detail: &'static str,
    /// Allowed answers, in match-priority order.
    pub options: &'static [&'static str],
}

impl ServiceDetail {
    pub fn allows(&self, option: &str) -> bool {
        self.options.contains(&option)
    }
}

pub const COMPLETELY_OUT: ServiceDetail = ServiceDetail {
    detail: "completely out?",
    options: &["yes", "no"],
};

pub const POTHOLE_LOCATION: ServiceDetail = ServiceDetail {
    detail: "pothole location",
    options: &[
        "bike lane",
        "crosswalk",
        "curb lane",
        "intersection",
        "traffic lane",
    ],
};

pub const BACKYARD_BAITED: ServiceDetail = ServiceDetail {
    detail: "backyard baited?",
    options: &["yes", "no"],
};

/// Every known service detail.
pub const SERVICE_DETAILS: [ServiceDetail; 3] = [COMPLETELY_OUT, POTHOLE_LOCATION, BACKYARD_BAITED];

/// Issue categories a citizen may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Issue {
    StreetLightOut,
    Pothole,
    RodentBaiting,
    GraffitiRemoval,
    AbandonedVehicle,
}

impl Issue {
    pub const ALL: [Issue; 5] = [
        Issue::StreetLightOut,
        Issue::Pothole,
        Issue::RodentBaiting,
        Issue::GraffitiRemoval,
        Issue::AbandonedVehicle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Issue::StreetLightOut => "street light out",
            Issue::Pothole => "pothole",
            Issue::RodentBaiting => "rodent baiting",
            Issue::GraffitiRemoval => "graffiti removal",
            Issue::AbandonedVehicle => "abandoned vehicle",
        }
    }

    /// Look up an issue by its display string.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|issue| issue.as_str() == s)
    }

    /// Service details that apply to this issue.
    pub fn details(self) -> &'static [ServiceDetail] {
        match self {
            Issue::StreetLightOut => &[COMPLETELY_OUT],
            Issue::Pothole => &[POTHOLE_LOCATION],
            Issue::RodentBaiting => &[BACKYARD_BAITED],
            Issue::GraffitiRemoval | Issue::AbandonedVehicle => &[],
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service details for an issue string; empty for unknown issues.
pub fn details_for(issue: &str) -> &'static [ServiceDetail] {
    Issue::parse(issue).map(Issue::details).unwrap_or(&[])
}

/// Find a catalogue detail by its question text.
pub fn find_detail(detail: &str) -> Option<&'static ServiceDetail> {
    SERVICE_DETAILS.iter().find(|sd| sd.detail == detail)
}
