use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate, NaiveTime};
use clap::Args;

use crate::infra::{
    InMemoryInterviewStore, InMemoryNotificationPublisher, StaticOfficeDirectory,
};
use interview_flow::error::AppError;
use interview_flow::workflows::interviews::{
    Actor, FeedbackDraft, InterviewLifecycleService, InterviewRequest, OfficeLocationId,
    PartyId,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Appointment date (YYYY-MM-DD). Defaults to tomorrow.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Skip the feedback and hire-marking steps.
    #[arg(long)]
    pub(crate) skip_feedback: bool,
}

/// Walks one interview through request, confirmation, reschedule,
/// completion, feedback, and hire-marking, printing each committed state.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryInterviewStore::default());
    let offices = Arc::new(StaticOfficeDirectory::default());
    let notifier = Arc::new(InMemoryNotificationPublisher::default());
    let service = InterviewLifecycleService::new(store, offices, notifier.clone());

    let employer = Actor::employer("emp-demo");
    let provider = Actor::provider("pro-demo");
    let date = args
        .date
        .unwrap_or_else(|| Local::now().date_naive() + Duration::days(1));
    let ten_am = NaiveTime::from_hms_opt(10, 0, 0).expect("valid time");

    let interview = service.create(
        &employer,
        InterviewRequest {
            provider_id: PartyId("pro-demo".to_string()),
            office_location_id: OfficeLocationId("office-1".to_string()),
            scheduled_date: date,
            scheduled_time: ten_am,
            duration_minutes: 45,
            notes: "Bring portfolio".to_string(),
        },
    )?;
    print_step("requested", &interview);

    let confirmed = service.confirm(&interview.id, &provider)?;
    print_step("confirmed", &confirmed);

    let rescheduled = service.reschedule(
        &interview.id,
        &provider,
        date + Duration::days(1),
        ten_am,
        "Prior booking moved".to_string(),
    )?;
    print_step("rescheduled", &rescheduled);

    let completed = service.complete(&interview.id, &employer)?;
    print_step("completed", &completed);

    if !args.skip_feedback {
        let with_feedback = service.submit_feedback(
            &interview.id,
            &employer,
            FeedbackDraft {
                rating: 5,
                comments: "Strong portfolio and clear communication".to_string(),
                strengths: Some("Punctual".to_string()),
                improvements: None,
                would_hire_again: true,
            },
        )?;
        print_step("feedback submitted", &with_feedback);

        let hired = service.mark_hired(&interview.id, &employer)?;
        print_step("hired", &hired);
    }

    println!("\nNotifications dispatched:");
    for event in notifier.events() {
        println!(
            "  -> {} about {} ({})",
            event.recipient, event.interview_id, event.transition
        );
    }

    Ok(())
}

fn print_step(step: &str, interview: &interview_flow::workflows::interviews::Interview) {
    println!("== {step} ==");
    match serde_json::to_string_pretty(&interview.view()) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => println!("  (unrenderable view: {err})"),
    }
}
