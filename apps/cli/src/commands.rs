use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use auth_cell::{
    AccountService, AdminService, ChangePasswordRequest, DirectoryService, LoginRequest,
    RegisterRequest, UpdateProfileRequest, User,
};
use center_cell::services::report::default_csv_filename;
use center_cell::{
    CenterService, CreateCenterRequest, MembershipService, ReportService, UpdateCenterRequest,
};
use inbox_cell::{MessagingService, SupportService};
use schedule_cell::calendar::{center_day_map, ClickPolicy, MonthGrid};
use schedule_cell::{
    AutoAssignSummary, AutoAssigner, BusyToggle, CenterScheduleApi, PersonalCalendarService,
    ScheduleService, SetDayOutcome,
};
use shared_config::AppConfig;
use shared_utils::{format_date, Month};

use crate::{
    AdminCommands, CenterCommands, Commands, InboxCommands, MemberCommands, MyCommands,
    ProfileCommands, ReportCommands, ScheduleCommands, SupportCommands,
};

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn month_or_current(month: Option<Month>) -> Month {
    month.unwrap_or_else(|| Month::of(local_today()))
}

fn require_token(config: &AppConfig) -> Result<&str> {
    config.token().ok_or_else(|| {
        warn!("Client not authenticated - run `roster login` and export ROSTER_API_TOKEN");
        anyhow!("Not signed in: set ROSTER_API_TOKEN or pass --token")
    })
}

fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("(none)");
    }
    for user in users {
        println!(
            "{}  {:<28} {:<32} {:?}/{:?}",
            user.id,
            user.display_name(),
            user.email.as_deref().unwrap_or("-"),
            user.global_role,
            user.status
        );
    }
}

fn print_ack(message: Option<String>, fallback: &str) {
    println!("{}", message.unwrap_or_else(|| fallback.to_string()));
}

pub async fn run(command: Commands, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            let response = AccountService::new(config)
                .login(LoginRequest { email, password })
                .await?;
            info!("Signed in as {}", response.user.display_name());
            println!("{}", response.access_token);
            Ok(())
        }
        Commands::Register { first_name, last_name, email, password, password_recheck } => {
            let response = AccountService::new(config)
                .register(RegisterRequest { first_name, last_name, email, password, password_recheck })
                .await?;
            print_ack(response.message, "Registration submitted; wait for admin approval");
            Ok(())
        }
        Commands::Me => {
            let user = AccountService::new(config).me(require_token(config)?).await?;
            print_users(std::slice::from_ref(&user));
            Ok(())
        }
        Commands::Profile { command } => profile(command, config).await,
        Commands::Centers { command } => centers(command, config).await,
        Commands::Members { command } => members(command, config).await,
        Commands::Schedule { command } => schedule(command, config).await,
        Commands::My { command } => my(command, config).await,
        Commands::Inbox { command } => inbox(command, config).await,
        Commands::Support { command } => support(command, config).await,
        Commands::Admin { command } => admin(command, config).await,
        Commands::Report { command } => report(command, config).await,
    }
}

async fn profile(command: ProfileCommands, config: &AppConfig) -> Result<()> {
    let token = require_token(config)?;
    let service = AccountService::new(config);

    let response = match command {
        ProfileCommands::Update { first_name, last_name, phone } => {
            service
                .update_profile(UpdateProfileRequest { first_name, last_name, phone }, token)
                .await?
        }
        ProfileCommands::Password { current, new, confirm } => {
            service
                .change_password(
                    ChangePasswordRequest {
                        current_password: current,
                        new_password: new,
                        confirm_password: confirm,
                    },
                    token,
                )
                .await?
        }
    };

    print_ack(response.message, "Profile updated");
    Ok(())
}

async fn centers(command: CenterCommands, config: &AppConfig) -> Result<()> {
    let token = require_token(config)?;
    let service = CenterService::new(config);

    match command {
        CenterCommands::List => {
            for center in service.list_centers(token).await? {
                println!(
                    "{}  {:<32} {}",
                    center.id,
                    center.name,
                    center.location.as_deref().unwrap_or("-")
                );
            }
        }
        CenterCommands::Create { name, location } => {
            let id = service
                .create_center(CreateCenterRequest { name, location }, token)
                .await?;
            println!("{}", id);
        }
        CenterCommands::Update { center_id, name, location } => {
            let response = service
                .update_center(&center_id, UpdateCenterRequest { name, location }, token)
                .await?;
            print_ack(response.message, "Center updated");
        }
        CenterCommands::Delete { center_id } => {
            let response = service.delete_center(&center_id, token).await?;
            print_ack(response.message, "Center deleted");
        }
    }

    Ok(())
}

async fn members(command: MemberCommands, config: &AppConfig) -> Result<()> {
    let token = require_token(config)?;
    let service = MembershipService::new(config);

    match command {
        MemberCommands::List { center_id } => {
            for member in service.list_members(&center_id, token).await? {
                println!(
                    "{}  {:<28} {:<6} {}",
                    member.user_id,
                    member.display_name(),
                    format!("{:?}", member.role).to_lowercase(),
                    member.email.as_deref().unwrap_or("-")
                );
            }
        }
        MemberCommands::Add { center_id, email } => {
            let user = service.add_member_by_email(&center_id, &email, token).await?;
            println!("Added {} to {}", user.display_name(), center_id);
        }
        MemberCommands::Remove { center_id, user_id } => {
            let response = service.remove_member(&center_id, &user_id, token).await?;
            println!(
                "Removed {} ({} future shift(s) dropped)",
                user_id, response.future_shifts_removed
            );
        }
        MemberCommands::Lead { center_id, user_id } => {
            let response = service.assign_lead(&center_id, &user_id, token).await?;
            print_ack(response.message, "Lead assigned");
        }
    }

    Ok(())
}

/// Leads edit their own center; admins edit any.
async fn edit_policy(center_id: &str, config: &AppConfig, token: &str) -> Result<ClickPolicy> {
    let me = AccountService::new(config).me(token).await?;
    let roster = MembershipService::new(config).list_members(center_id, token).await?;
    let is_lead = roster.iter().any(|m| m.user_id == me.id && m.is_lead());

    Ok(ClickPolicy {
        is_lead,
        clickable: me.is_admin().then_some(true),
        disable_past: None,
    })
}

/// Runs the batch for a center, refusing callers who cannot edit its schedule.
async fn auto_assign_month(
    center_id: &str,
    month: Month,
    today: NaiveDate,
    config: &AppConfig,
    token: &str,
) -> Result<AutoAssignSummary> {
    if !edit_policy(center_id, config, token).await?.allows_click() {
        bail!("Only the center lead or an admin can auto-assign center {}", center_id);
    }

    let assigner = AutoAssigner::new(CenterScheduleApi::new(config, token));
    Ok(assigner.run(center_id, month, today).await?)
}

async fn schedule(command: ScheduleCommands, config: &AppConfig) -> Result<()> {
    let token = require_token(config)?;
    let service = ScheduleService::new(config);

    match command {
        ScheduleCommands::Show { center_id, month } => {
            let month = month_or_current(month);
            let days = service.get_full_month(&center_id, month, token).await?;
            let grid = MonthGrid::build(month, &center_day_map(&days), ClickPolicy::default());
            print!("{}", grid.render());
        }
        ScheduleCommands::Set { center_id, date, member_id } => {
            let month = Month::of(date);
            let days = service.get_full_month(&center_id, month, token).await?;
            let policy = edit_policy(&center_id, config, token).await?;
            if !policy.allows_click() {
                bail!("Only the center lead or an admin can edit center {}", center_id);
            }
            let grid = MonthGrid::build(month, &center_day_map(&days), policy.not_before(local_today()));

            grid.click(date, |_, _| ())
                .ok_or_else(|| anyhow!("{} is in the past and can no longer be changed", format_date(date)))?;

            match service.set_day(&center_id, &member_id, date, token).await? {
                SetDayOutcome::Assigned => println!("Assigned {} on {}", member_id, format_date(date)),
                SetDayOutcome::Replaced => println!("Replaced holder of {} with {}", format_date(date), member_id),
            }
        }
        ScheduleCommands::Unassign { center_id, date } => {
            let response = service.unassign(&center_id, date, token).await?;
            print_ack(response.message, "Day cleared");
        }
        ScheduleCommands::AutoAssign { center_id, month, today: today_override } => {
            let today = today_override.unwrap_or_else(local_today);
            let month = month.unwrap_or_else(|| Month::of(today));

            let summary = auto_assign_month(&center_id, month, today, config, token).await?;

            println!("{}", summary.message());
            if summary.fallback_count() > 0 {
                println!("{} day(s) went to a member who also holds a neighbouring day", summary.fallback_count());
            }
            if !summary.unfilled.is_empty() {
                let dates: Vec<String> = summary.unfilled.iter().map(|d| format_date(*d)).collect();
                println!("Still unassigned: {}", dates.join(", "));
            }

            let days = service.get_full_month(&center_id, month, token).await?;
            let grid = MonthGrid::build(month, &center_day_map(&days), ClickPolicy::default());
            print!("{}", grid.render());
        }
    }

    Ok(())
}

async fn my(command: MyCommands, config: &AppConfig) -> Result<()> {
    let token = require_token(config)?;
    let service = PersonalCalendarService::new(config);

    match command {
        MyCommands::Schedule { month } => {
            let month = month_or_current(month);
            let days = service.day_map(month, token).await?;
            let grid = MonthGrid::build(month, &days, ClickPolicy::forced(true));
            print!("{}", grid.render());
        }
        MyCommands::Busy { month } => {
            let month = month_or_current(month);
            let days = service.busy_days(month, token).await?;
            if days.is_empty() {
                println!("No busy days in {}", month.label());
            }
            for day in days {
                println!("{}", format_date(day));
            }
        }
        MyCommands::ToggleBusy { date } => match service.toggle_busy(date, local_today(), token).await? {
            BusyToggle::Marked => println!("{} marked busy", format_date(date)),
            BusyToggle::Cleared => println!("{} is free again", format_date(date)),
        },
    }

    Ok(())
}

async fn inbox(command: InboxCommands, config: &AppConfig) -> Result<()> {
    let token = require_token(config)?;
    let service = MessagingService::new(config);

    match command {
        InboxCommands::Conversations => {
            for conversation in service.conversations(token).await? {
                println!(
                    "{:<40} {:<24} {}",
                    conversation.conversation_id,
                    conversation.timestamp.as_deref().unwrap_or(""),
                    conversation.last_message.as_deref().unwrap_or("")
                );
            }
        }
        InboxCommands::Read { conversation_id } => {
            let messages = service.messages(&conversation_id, token).await?;

            let mut ids: Vec<String> = messages
                .iter()
                .filter(|m| !m.system)
                .flat_map(|m| [m.from.clone(), m.to.clone()])
                .collect();
            ids.sort();
            ids.dedup();
            let names = DirectoryService::new(config).basics(&ids, token).await?;

            for message in messages {
                let sender = if message.system {
                    "System".to_string()
                } else {
                    names
                        .iter()
                        .find(|u| u.id == message.from)
                        .map(|u| u.display_name())
                        .unwrap_or_else(|| message.from.clone())
                };
                println!(
                    "[{}] {}: {}",
                    message.timestamp.as_deref().unwrap_or(""),
                    sender,
                    message.content
                );
            }
        }
        InboxCommands::Send { to_user_id, content } => {
            let response = service.send(&to_user_id, &content, token).await?;
            println!("Sent in {}", response.conversation_id);
        }
    }

    Ok(())
}

async fn support(command: SupportCommands, config: &AppConfig) -> Result<()> {
    let service = SupportService::new(config);

    match command {
        SupportCommands::Send { message, email } => {
            let response = service
                .submit(&message, email.as_deref(), config.token())
                .await?;
            print_ack(response.message, "Support message received");
        }
        SupportCommands::List { resolved } => {
            for ticket in service.list(resolved, require_token(config)?).await? {
                println!(
                    "{}  [{}] {:<28} {}",
                    ticket.id,
                    if ticket.resolved { "x" } else { " " },
                    ticket.email.as_deref().unwrap_or("-"),
                    ticket.message.as_deref().unwrap_or("")
                );
            }
        }
        SupportCommands::Resolve { ticket_id, reopen } => {
            let response = service
                .set_resolved(&ticket_id, !reopen, require_token(config)?)
                .await?;
            println!("{} resolved={}", ticket_id, response.resolved);
        }
    }

    Ok(())
}

async fn admin(command: AdminCommands, config: &AppConfig) -> Result<()> {
    let token = require_token(config)?;
    let service = AdminService::new(config);

    let response = match command {
        AdminCommands::Users => {
            print_users(&service.list_users(token).await?);
            return Ok(());
        }
        AdminCommands::Pending => {
            print_users(&service.list_pending(token).await?);
            return Ok(());
        }
        AdminCommands::Approve { user_id } => service.approve(&user_id, token).await?,
        AdminCommands::Reject { user_id } => service.reject(&user_id, token).await?,
        AdminCommands::SetEmail { user_id, email } => {
            service.update_email(&user_id, &email, token).await?
        }
        AdminCommands::SetPassword { user_id, password } => {
            service.set_password(&user_id, &password, token).await?
        }
        AdminCommands::Delete { user_id } => service.delete_user(&user_id, token).await?,
    };

    print_ack(response.message, "Done");
    Ok(())
}

async fn report(command: ReportCommands, config: &AppConfig) -> Result<()> {
    let token = require_token(config)?;
    let service = ReportService::new(config);

    match command {
        ReportCommands::Show { center_id, month } => {
            let month = month_or_current(month);
            let report = service.monthly_report(&center_id, month, token).await?;

            println!("{} for center {}", month.label(), center_id);
            for row in &report.rows {
                println!("{:<32} {:>4}", row.display_name(), row.count);
            }
            println!("{:<32} {:>4}", "Total", report.total);
        }
        ReportCommands::Csv { center_id, month, output } => {
            let month = month_or_current(month);
            let dest = match output {
                Some(path) => path,
                None => PathBuf::from(default_csv_filename(&center_id, month)),
            };

            let written = service
                .export_csv(&center_id, month, &dest, token)
                .await
                .context("CSV export failed")?;
            println!("Wrote {} bytes to {}", written, dest.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use shared_utils::test_utils::{MockRosterResponses, TestConfig, TestMember};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn mount_me_and_roster(server: &MockServer, roster: &[TestMember]) {
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                MockRosterResponses::user_response("u1", "approved")
            ))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/centers/c1/members"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                MockRosterResponses::members_response(roster)
            ))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn auto_assign_is_refused_for_plain_medics() {
        let mock_server = MockServer::start().await;
        let config = TestConfig::with_url(&mock_server.uri()).to_app_config();
        mount_me_and_roster(&mock_server, &[TestMember::medic("u1"), TestMember::lead("u9")]).await;

        Mock::given(method("GET"))
            .and(path("/centers/c1/schedule"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/centers/c1/schedule"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&mock_server)
            .await;

        let month: Month = "2026-10".parse().unwrap();
        let err = auto_assign_month("c1", month, date(2026, 10, 17), &config, "test-token")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Only the center lead or an admin"));
    }

    #[tokio::test]
    async fn center_lead_may_edit() {
        let mock_server = MockServer::start().await;
        let config = TestConfig::with_url(&mock_server.uri()).to_app_config();
        mount_me_and_roster(&mock_server, &[TestMember::lead("u1"), TestMember::medic("u2")]).await;

        let policy = edit_policy("c1", &config, "test-token").await.unwrap();

        assert!(policy.is_lead);
        assert!(policy.allows_click());
        assert!(!policy.not_before(date(2026, 10, 17)).allows_click_on(date(2026, 10, 16)));
    }

    #[test]
    fn missing_token_is_reported() {
        let config = AppConfig {
            api_url: "http://127.0.0.1:5000".to_string(),
            api_token: String::new(),
        };

        let err = require_token(&config).unwrap_err();
        assert!(err.to_string().contains("ROSTER_API_TOKEN"));
    }
}
