use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use center_cell::{Member, MembershipService};
use shared_config::AppConfig;
use shared_models::AppError;
use shared_utils::Month;

use crate::error::ScheduleError;
use crate::models::ScheduleDay;
use crate::services::schedule::{normalize_month, ScheduleService};

/// The three API calls the auto-assigner needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleApi: Send + Sync {
    async fn fetch_members(&self, center_id: &str) -> Result<Vec<Member>, AppError>;
    async fn fetch_month(&self, center_id: &str, month: Month) -> Result<Vec<ScheduleDay>, AppError>;
    async fn assign(&self, center_id: &str, member_id: &str, date: NaiveDate) -> Result<(), AppError>;
}

/// `ScheduleApi` over the HTTP services, acting as one signed-in user.
pub struct CenterScheduleApi {
    schedule: ScheduleService,
    members: MembershipService,
    auth_token: String,
}

impl CenterScheduleApi {
    pub fn new(config: &AppConfig, auth_token: impl Into<String>) -> Self {
        Self {
            schedule: ScheduleService::new(config),
            members: MembershipService::new(config),
            auth_token: auth_token.into(),
        }
    }
}

fn into_app_error(err: anyhow::Error) -> AppError {
    err.downcast::<AppError>()
        .unwrap_or_else(|other| AppError::Internal(other.to_string()))
}

#[async_trait]
impl ScheduleApi for CenterScheduleApi {
    async fn fetch_members(&self, center_id: &str) -> Result<Vec<Member>, AppError> {
        self.members
            .list_members(center_id, &self.auth_token)
            .await
            .map_err(into_app_error)
    }

    async fn fetch_month(&self, center_id: &str, month: Month) -> Result<Vec<ScheduleDay>, AppError> {
        self.schedule
            .get_month(center_id, month, &self.auth_token)
            .await
            .map(|response| response.days)
            .map_err(into_app_error)
    }

    async fn assign(&self, center_id: &str, member_id: &str, date: NaiveDate) -> Result<(), AppError> {
        self.schedule
            .assign(center_id, member_id, date, &self.auth_token)
            .await
            .map(|_| ())
            .map_err(into_app_error)
    }
}

/// Medics and leads in roster order, each once.
pub fn eligible_members(members: &[Member]) -> Vec<String> {
    let mut seen = HashSet::new();
    members
        .iter()
        .filter(|member| member.role.is_schedulable())
        .filter(|member| seen.insert(member.user_id.clone()))
        .map(|member| member.user_id.clone())
        .collect()
}

/// Who holds each day of the month, and how many days each eligible member holds.
#[derive(Debug, Clone)]
pub struct AssignmentState {
    month: Month,
    current: BTreeMap<NaiveDate, Option<String>>,
    counts: HashMap<String, u32>,
}

impl AssignmentState {
    pub fn seed(month: Month, eligible: &[String], days: Vec<ScheduleDay>) -> Self {
        let current: BTreeMap<NaiveDate, Option<String>> = normalize_month(month, days)
            .into_iter()
            .map(|day| {
                let holder = day.assignee().map(str::to_string);
                (day.date, holder)
            })
            .collect();

        let mut counts: HashMap<String, u32> =
            eligible.iter().map(|id| (id.clone(), 0)).collect();
        for holder in current.values().flatten() {
            if let Some(count) = counts.get_mut(holder) {
                *count += 1;
            }
        }

        Self { month, current, counts }
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn holder(&self, date: NaiveDate) -> Option<&str> {
        self.current.get(&date).and_then(|holder| holder.as_deref())
    }

    pub fn count(&self, member_id: &str) -> u32 {
        self.counts.get(member_id).copied().unwrap_or(0)
    }

    /// Free days from `today` on, ascending.
    pub fn targets(&self, today: NaiveDate) -> Vec<NaiveDate> {
        self.current
            .iter()
            .filter(|(date, holder)| holder.is_none() && **date >= today)
            .map(|(date, _)| *date)
            .collect()
    }

    pub fn candidate_plan(&self, eligible: &[String], date: NaiveDate) -> CandidatePlan {
        let mut base_order = eligible.to_vec();
        base_order.sort_by_key(|id| self.count(id));

        let prev = date.pred_opt().and_then(|d| self.holder(d));
        let next = date.succ_opt().and_then(|d| self.holder(d));
        let preferred = base_order
            .iter()
            .filter(|id| Some(id.as_str()) != prev && Some(id.as_str()) != next)
            .cloned()
            .collect();

        CandidatePlan { base_order, preferred }
    }

    pub fn record(&mut self, date: NaiveDate, member_id: &str) {
        self.current.insert(date, Some(member_id.to_string()));
        *self.counts.entry(member_id.to_string()).or_insert(0) += 1;
    }
}

/// Candidates for one date: fewest shifts first, and the same list without
/// the neighbouring days' holders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePlan {
    pub base_order: Vec<String>,
    pub preferred: Vec<String>,
}

/// Outcome of one pass over a candidate list. Rejections seen on the way are kept.
#[derive(Debug)]
pub enum AttemptResult {
    Placed {
        member_id: String,
        rejections: Vec<ScheduleError>,
    },
    Exhausted(Vec<ScheduleError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignPass {
    Preferred,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub date: NaiveDate,
    pub member_id: String,
    pub pass: AssignPass,
}

#[derive(Debug, Clone)]
pub struct AutoAssignSummary {
    pub center_id: String,
    pub month: Month,
    pub assignments: Vec<Assignment>,
    pub unfilled: Vec<NaiveDate>,
    pub rejected_attempts: usize,
}

impl AutoAssignSummary {
    fn new(center_id: &str, month: Month) -> Self {
        Self {
            center_id: center_id.to_string(),
            month,
            assignments: Vec::new(),
            unfilled: Vec::new(),
            rejected_attempts: 0,
        }
    }

    pub fn assigned_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn fallback_count(&self) -> usize {
        self.assignments
            .iter()
            .filter(|a| a.pass == AssignPass::Fallback)
            .count()
    }

    pub fn message(&self) -> String {
        format!("Auto-assigned {} day(s)", self.assigned_count())
    }
}

/// Fills a center's free, non-past days, spreading shifts evenly and
/// avoiding back-to-back days for the same member where it can.
pub struct AutoAssigner<A: ScheduleApi> {
    api: A,
}

impl<A: ScheduleApi> AutoAssigner<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn run(
        &self,
        center_id: &str,
        month: Month,
        today: NaiveDate,
    ) -> Result<AutoAssignSummary, ScheduleError> {
        info!("Auto-assigning center {} for {}", center_id, month);

        let members = self.api.fetch_members(center_id).await.map_err(|source| {
            ScheduleError::FetchFailure {
                what: "roster",
                center_id: center_id.to_string(),
                source,
            }
        })?;
        let days = self.api.fetch_month(center_id, month).await.map_err(|source| {
            ScheduleError::FetchFailure {
                what: "schedule",
                center_id: center_id.to_string(),
                source,
            }
        })?;

        let eligible = eligible_members(&members);
        if eligible.is_empty() {
            return Err(ScheduleError::NoEligibleMembers(center_id.to_string()));
        }

        let mut state = AssignmentState::seed(month, &eligible, days);
        let summary = self.fill(center_id, &eligible, &mut state, today).await;

        info!(
            "{} for center {} ({} unfilled, {} rejected attempts)",
            summary.message(),
            center_id,
            summary.unfilled.len(),
            summary.rejected_attempts
        );
        Ok(summary)
    }

    pub async fn fill(
        &self,
        center_id: &str,
        eligible: &[String],
        state: &mut AssignmentState,
        today: NaiveDate,
    ) -> AutoAssignSummary {
        let mut summary = AutoAssignSummary::new(center_id, state.month());

        for date in state.targets(today) {
            let plan = state.candidate_plan(eligible, date);
            let mut placed = None;

            for (pass, candidates) in [
                (AssignPass::Preferred, &plan.preferred),
                (AssignPass::Fallback, &plan.base_order),
            ] {
                match self.try_candidates(center_id, date, candidates).await {
                    AttemptResult::Placed { member_id, rejections } => {
                        summary.rejected_attempts += rejections.len();
                        placed = Some((member_id, pass));
                        break;
                    }
                    AttemptResult::Exhausted(rejections) => {
                        summary.rejected_attempts += rejections.len();
                    }
                }
            }

            match placed {
                Some((member_id, pass)) => {
                    state.record(date, &member_id);
                    summary.assignments.push(Assignment { date, member_id, pass });
                }
                None => {
                    warn!("No member could take {} in center {}", date, center_id);
                    summary.unfilled.push(date);
                }
            }
        }

        summary
    }

    /// Tries each candidate in order until one assignment goes through.
    pub async fn try_candidates(
        &self,
        center_id: &str,
        date: NaiveDate,
        candidates: &[String],
    ) -> AttemptResult {
        let mut rejections = Vec::new();

        for member_id in candidates {
            match self.api.assign(center_id, member_id, date).await {
                Ok(()) => {
                    debug!("Assigned {} on {}", member_id, date);
                    return AttemptResult::Placed {
                        member_id: member_id.clone(),
                        rejections,
                    };
                }
                Err(source) => {
                    let refused = source.is_rejection();
                    let rejection = ScheduleError::AssignmentRejected {
                        member_id: member_id.clone(),
                        date,
                        source,
                    };
                    if refused {
                        debug!("{}", rejection);
                    } else {
                        warn!("{}; trying next candidate", rejection);
                    }
                    rejections.push(rejection);
                }
            }
        }

        AttemptResult::Exhausted(rejections)
    }
}
