//! Plain-text rendering of page views

use raiser_http::types::{Submission, User};
use raiser_session::pages::{DashboardView, IssuesView, ProblemView, ProfileView, SubmissionsView};

pub fn user(user: &User) {
    println!("{} <{}>", user.username, user.email);
    println!("  id:      {}", user.id);
    println!("  role:    {}", user.role);
    println!("  created: {}", user.created_at);
}

fn submission_row(submission: &Submission) {
    let score = match (submission.test_cases_passed, submission.total_test_cases) {
        (Some(passed), Some(total)) => format!("{passed}/{total}"),
        _ => "-".to_string(),
    };
    println!(
        "{:>6}  {:>7}  {:<20}  {:>7}  {}",
        submission.id,
        submission.problem_id,
        submission.status,
        score,
        submission.created_at
    );
}

fn submission_header() {
    println!(
        "{:>6}  {:>7}  {:<20}  {:>7}  {}",
        "ID", "PROBLEM", "STATUS", "TESTS", "SUBMITTED"
    );
}

fn error_banner(error: Option<&str>) {
    if let Some(error) = error {
        eprintln!("error: {error}");
    }
}

pub fn submissions(view: &SubmissionsView) {
    error_banner(view.error.as_deref());

    if view.is_empty {
        println!("No submissions yet.");
    } else if !view.rows.is_empty() {
        submission_header();
        view.rows.iter().for_each(submission_row);
    }

    let previous = if view.has_previous { "--page N-1" } else { "-" };
    let next = if view.has_next { "--page N+1" } else { "-" };
    println!();
    println!("page {}  previous: {previous}  next: {next}", view.page);
}

pub fn dashboard(view: &DashboardView) {
    error_banner(view.error.as_deref());

    if let Some(user) = &view.user {
        println!("Welcome back, {}", user.username);
        println!();
    }

    let stats = &view.stats;
    println!(
        "Problems solved: {}/{}",
        stats.problems_solved, stats.problems_total
    );
    println!(
        "Recent submissions: {} ({} accepted)",
        stats.recent_submissions, stats.accepted
    );
    for (status, count) in &stats.by_status {
        println!("  {status:<20} {count}");
    }

    if !view.recent.is_empty() {
        println!();
        submission_header();
        view.recent.iter().for_each(submission_row);
    }
}

pub fn problem(view: &ProblemView) {
    error_banner(view.error.as_deref());

    let Some(problem) = &view.problem else {
        return;
    };

    let solved = if problem.is_solved { "  (solved)" } else { "" };
    println!("#{} {} [{}]{solved}", problem.id, problem.title, problem.difficulty);
    if !problem.description.is_empty() {
        println!();
        println!("{}", problem.description);
    }

    for (index, case) in view.samples.iter().enumerate() {
        println!();
        println!("Sample {}", index + 1);
        println!("  input:");
        for line in case.input.lines() {
            println!("    {line}");
        }
        println!("  expected:");
        for line in case.expected_output.lines() {
            println!("    {line}");
        }
    }
}

pub fn profile(view: &ProfileView) {
    error_banner(view.error.as_deref());

    if let Some(current) = &view.user {
        user(current);
    }
    if view.password_changed {
        println!("Password changed.");
    }
}

pub fn issues(view: &IssuesView) {
    error_banner(view.error.as_deref());

    if view.is_empty {
        println!("No issues reported.");
        return;
    }

    for issue in &view.rows {
        println!(
            "{:>6}  {:>7}  {:<10}  {}  ({})",
            issue.id, issue.problem_id, issue.status, issue.title, issue.reported_by
        );
    }
}
