//! Plain-text rendering of backend views for the terminal.

use chrono::{Datelike, NaiveDate};
use household_backend::domain::{day_key, recurrence};
use shared::{
    DayPlan, FairnessStats, GroupedChores, MonthOverview, PersonProfile, RecurringChore, RotaSlot,
    Task, TaskDayGroup, TodayFocus,
};

fn task_line(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!("[{}] #{} {}", mark, task.id, task.name);
    if !task.description.is_empty() {
        line.push_str(&format!(" ({})", task.description));
    }
    if let Some(assignee) = &task.assigned_to {
        line.push_str(&format!(" @{}", assignee.short()));
    }
    line
}

fn chore_line(chore: &RecurringChore) -> String {
    let mut line = format!(
        "#{} {} [{}]",
        chore.id,
        chore.name,
        recurrence::timeline_label(chore.timeline)
    );
    if chore.paused {
        line.push_str(" (paused)");
    }
    line
}

pub fn print_today(focus: &TodayFocus) {
    println!("Today ({})", focus.day_key);
    println!("  Cooking: {}", focus.cook_label);
    if focus.tasks.is_empty() {
        println!("  No tasks due today");
    }
    for task in &focus.tasks {
        println!("  {}", task_line(task));
    }
}

pub fn print_day_plan(plan: &DayPlan) {
    println!("{}", day_key::display_date(plan.date));
    if let Some(cook) = &plan.cook {
        let meal = plan
            .cooking_assignment
            .as_ref()
            .and_then(|a| a.meal.as_deref())
            .map(|m| format!(": {}", m))
            .unwrap_or_default();
        println!("  Dinner by {}{}", cook.label, meal);
    }
    for chore in &plan.chores {
        println!("  chore {}", chore_line(chore));
    }
    for task in &plan.tasks {
        println!("  {}", task_line(task));
    }
}

pub fn print_month(overview: &MonthOverview) {
    println!("{:04}-{:02}", overview.year, overview.month);
    println!("  Su  Mo  Tu  We  Th  Fr  Sa");
    for week in overview.days.chunks(7) {
        let cells: Vec<String> = week
            .iter()
            .map(|day| {
                if !day.in_month {
                    return "    ".to_string();
                }
                let marker = match (day.is_today, day.has_tasks || day.has_cooking || day.has_chores) {
                    (true, _) => '*',
                    (false, true) => '+',
                    (false, false) => ' ',
                };
                format!("{:>3}{}", day.date.day(), marker)
            })
            .collect();
        println!("{}", cells.join(""));
    }
    println!("  * today   + something planned");
}

pub fn print_rota(slots: &[RotaSlot]) {
    for slot in slots {
        let label = if slot.cook.label.is_empty() { "-" } else { slot.cook.label.as_str() };
        let meal = slot
            .assignment
            .as_ref()
            .and_then(|a| a.meal.as_deref())
            .unwrap_or("");
        println!("{} {}  {:<12} {}", slot.date.format("%a"), slot.day_key, label, meal);
    }
}

pub fn print_grouped_chores(groups: &[GroupedChores]) {
    if groups.is_empty() {
        println!("No recurring chores");
    }
    for group in groups {
        println!("{}", group.weekday_label);
        for chore in &group.chores {
            println!("  {}", chore_line(chore));
        }
    }
}

pub fn print_chores(chores: &[RecurringChore]) {
    for chore in chores {
        println!("{}", chore_line(chore));
    }
}

pub fn print_fairness(stats: &FairnessStats) {
    println!("{}", stats.period_label);
    if stats.is_empty {
        println!("  No cooking assignments in this period");
        return;
    }
    for entry in &stats.counts {
        println!("  {:<16} {}", entry.label, "#".repeat(entry.count as usize));
    }
    if let (Some(most), Some(least)) = (&stats.most_cooked, &stats.least_cooked) {
        println!("  Most: {} ({})  Least: {} ({})", most.label, most.count, least.label, least.count);
    }
}

pub fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks");
    }
    for task in tasks {
        println!("{}", task_line(task));
    }
}

pub fn print_task_groups(groups: &[TaskDayGroup]) {
    for group in groups {
        println!("{}", group.display_date);
        for task in &group.tasks {
            println!("  {}", task_line(task));
        }
    }
}

pub fn print_profiles(profiles: &[PersonProfile]) {
    for profile in profiles {
        println!("{} {} {}", profile.color, profile.display_name, profile.principal);
    }
}

pub fn print_week(plans: &[DayPlan], today: NaiveDate) {
    for plan in plans {
        if plan.date == today {
            print!("> ");
        }
        print_day_plan(plan);
    }
}
