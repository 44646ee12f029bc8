//! Fixed pricing schedule.
//!
//! Not configurable at runtime. No rounding anywhere: formulas are integer
//! arithmetic over integer inputs, and 1 credit = 1 cent exactly.

/// Base cost of any search (webset creation or added search).
pub const SEARCH_BASE_CREDITS: u64 = 45;
/// Additional cost per requested result.
pub const SEARCH_PER_RESULT_CREDITS: u64 = 3;
/// Cost per item enriched, taken at enrichment time.
pub const ENRICHMENT_PER_ITEM_CREDITS: u64 = 10;
/// Documented monitor rate per scheduled day. Monitor creation is not
/// separately charged by the metered workflow; the rate exists for quoting.
pub const MONITOR_PER_DAY_CREDITS: u64 = 5;

/// One credit is one cent.
pub const CENTS_PER_CREDIT: u64 = 1;

/// A billable operation and its cost basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillableOperation {
    /// Webset creation or a search added to an existing webset.
    Search { requested_count: u64 },
    /// Enrichment over every item present at enrichment time.
    Enrichment { item_count: u64 },
    /// Recurring monitor, priced per scheduled day.
    Monitor { scheduled_days: u64 },
}

impl BillableOperation {
    /// Cost in credits.
    #[must_use]
    pub const fn credits(self) -> u64 {
        match self {
            Self::Search { requested_count } => {
                SEARCH_BASE_CREDITS + SEARCH_PER_RESULT_CREDITS * requested_count
            }
            Self::Enrichment { item_count } => ENRICHMENT_PER_ITEM_CREDITS * item_count,
            Self::Monitor { scheduled_days } => MONITOR_PER_DAY_CREDITS * scheduled_days,
        }
    }

    /// Cost in cents, the unit the ledger debits in.
    #[must_use]
    pub const fn cents(self) -> u64 {
        self.credits() * CENTS_PER_CREDIT
    }
}

/// Human-readable cost string for tool output.
///
/// Unmetered (privileged) executions report the would-be cost annotated so
/// the caller can tell nothing was charged.
#[must_use]
pub fn cost_label(credits: u64, metered: bool) -> String {
    if metered {
        format!("{credits} credits")
    } else {
        format!("{credits} credits (unmetered - not charged)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(BillableOperation::Search { requested_count: 0 }, 45)]
    #[case(BillableOperation::Search { requested_count: 10 }, 75)]
    #[case(BillableOperation::Search { requested_count: 100 }, 345)]
    #[case(BillableOperation::Enrichment { item_count: 0 }, 0)]
    #[case(BillableOperation::Enrichment { item_count: 7 }, 70)]
    #[case(BillableOperation::Monitor { scheduled_days: 1 }, 5)]
    #[case(BillableOperation::Monitor { scheduled_days: 30 }, 150)]
    fn pricing_schedule(#[case] op: BillableOperation, #[case] expected: u64) {
        assert_eq!(op.credits(), expected);
    }

    #[test]
    fn credits_equal_cents() {
        let op = BillableOperation::Search { requested_count: 10 };
        assert_eq!(op.cents(), op.credits());
    }

    #[test]
    fn cost_labels() {
        assert_eq!(cost_label(75, true), "75 credits");
        assert_eq!(cost_label(75, false), "75 credits (unmetered - not charged)");
    }
}
