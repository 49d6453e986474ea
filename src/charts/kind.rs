//! Chart Kind Module
//! The seven fixed chart kinds offered by the dashboard selector.

use serde::{Deserialize, Serialize};

/// One of the seven charts the user can pick. Dispatch is an exhaustive match,
/// so an unknown chart name is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    TotalBill,
    Tips,
    TotalBillVsTips,
    TotalBillVsTipsByGender,
    TipsByDayOfWeekByGender,
    TotalBillByDayAndTime,
    TipsByDayTime,
}

impl Default for ChartKind {
    fn default() -> Self {
        ChartKind::TotalBill
    }
}

impl ChartKind {
    /// Selector order matches the original dashboard listing.
    pub const ALL: [ChartKind; 7] = [
        ChartKind::TotalBill,
        ChartKind::Tips,
        ChartKind::TotalBillVsTips,
        ChartKind::TotalBillVsTipsByGender,
        ChartKind::TipsByDayOfWeekByGender,
        ChartKind::TotalBillByDayAndTime,
        ChartKind::TipsByDayTime,
    ];

    /// Display label shown in the selector and as the chart heading.
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::TotalBill => "Total Bill",
            ChartKind::Tips => "Tips",
            ChartKind::TotalBillVsTips => "Total Bill vs. Tips",
            ChartKind::TotalBillVsTipsByGender => "Total Bill vs. Tips by Gender",
            ChartKind::TipsByDayOfWeekByGender => "Tips vs. Day of the Week by Gender",
            ChartKind::TotalBillByDayAndTime => "Total Bill by Day of the Week and Day Time",
            ChartKind::TipsByDayTime => "Tips by Day Time",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_kinds_with_unique_labels() {
        assert_eq!(ChartKind::ALL.len(), 7);
        let mut labels: Vec<&str> = ChartKind::ALL.iter().map(|k| k.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 7);
    }

    #[test]
    fn labels_match_selector_strings() {
        assert_eq!(ChartKind::TotalBill.label(), "Total Bill");
        assert_eq!(
            ChartKind::TipsByDayOfWeekByGender.label(),
            "Tips vs. Day of the Week by Gender"
        );
    }
}
