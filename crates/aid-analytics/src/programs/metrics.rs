use super::domain::{round_percent, Beneficiary, BeneficiaryStatus, Program};
use serde::Serialize;

/// Per-status beneficiary counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub processing: usize,
    pub approved: usize,
    pub rejected: usize,
    pub disbursed: usize,
    pub completed: usize,
    pub other: usize,
}

impl StatusCounts {
    pub fn tally<'a>(beneficiaries: impl IntoIterator<Item = &'a Beneficiary>) -> Self {
        let mut counts = Self::default();
        for beneficiary in beneficiaries {
            let slot = match beneficiary.status {
                BeneficiaryStatus::Pending => &mut counts.pending,
                BeneficiaryStatus::Processing => &mut counts.processing,
                BeneficiaryStatus::Approved => &mut counts.approved,
                BeneficiaryStatus::Rejected => &mut counts.rejected,
                BeneficiaryStatus::Disbursed => &mut counts.disbursed,
                BeneficiaryStatus::Completed => &mut counts.completed,
                BeneficiaryStatus::Other => &mut counts.other,
            };
            *slot += 1;
        }
        counts
    }

    pub fn get(&self, status: BeneficiaryStatus) -> usize {
        match status {
            BeneficiaryStatus::Pending => self.pending,
            BeneficiaryStatus::Processing => self.processing,
            BeneficiaryStatus::Approved => self.approved,
            BeneficiaryStatus::Rejected => self.rejected,
            BeneficiaryStatus::Disbursed => self.disbursed,
            BeneficiaryStatus::Completed => self.completed,
            BeneficiaryStatus::Other => self.other,
        }
    }
}

/// Counts, rates, and monetary sums reduced from a program's beneficiary list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramMetrics {
    pub total: usize,
    pub paid_count: usize,
    pub pending_count: usize,
    pub status_counts: StatusCounts,
    pub completion_percentage: u32,
    pub payment_rate: u32,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub pending_amount: f64,
    pub average_amount: f64,
}

impl ProgramMetrics {
    pub fn aggregate(program: &Program, beneficiaries: &[Beneficiary]) -> Self {
        let total = beneficiaries.len();
        let mut paid_count = 0;
        let mut pending_count = 0;
        let mut total_amount = 0.0;
        let mut paid_amount = 0.0;
        let mut pending_amount = 0.0;

        for beneficiary in beneficiaries {
            let amount = coerce_amount(beneficiary.amount);
            total_amount += amount;

            if beneficiary.is_paid_out() {
                paid_count += 1;
                paid_amount += amount;
            } else if beneficiary.is_awaiting_payment() {
                pending_count += 1;
                pending_amount += amount;
            }
        }

        let completion_percentage = program
            .capacity()
            .map(|max| round_percent(total as f64, max as f64))
            .unwrap_or(0);
        let payment_rate = round_percent(paid_count as f64, total as f64);
        let average_amount = if total > 0 {
            (total_amount / total as f64).round()
        } else {
            0.0
        };

        Self {
            total,
            paid_count,
            pending_count,
            status_counts: StatusCounts::tally(beneficiaries),
            completion_percentage,
            payment_rate,
            total_amount,
            paid_amount,
            pending_amount,
            average_amount,
        }
    }

    /// Share of the program allocation (`amount × maxBeneficiaries`) already committed.
    pub fn budget_utilization(&self, program: &Program) -> u32 {
        let allocation = program
            .capacity()
            .map(|max| coerce_amount(program.amount) * max as f64)
            .unwrap_or(0.0);
        round_percent(self.total_amount, allocation)
    }
}

fn coerce_amount(amount: f64) -> f64 {
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}
