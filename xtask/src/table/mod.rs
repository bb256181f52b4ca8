//! `up`, `down` and `seed`: the commands that touch the task table.

mod aws;
mod error;
mod plan;
mod seed;

use crate::output::{Output, Tone};
use error::{Result, XtaskError};
use plan::{Down, Up};

/// Tasks listed before seeding unless `--all` is given.
const PREVIEW: usize = 5;

pub async fn up(table: &str, out: &Output) -> Result<()> {
    let (client, target) = aws::connect().await;
    out.say(format!("{} {target}", header("target")));

    let step = plan::plan_up(aws::describe(&client, table).await?.as_ref());
    match &step {
        Up::Create => out.say_in(Tone::Added, step.summary(table)),
        Up::Ready => {
            out.say_in(Tone::Unchanged, step.summary(table));
            return Ok(());
        }
        Up::Conflict(reason) => {
            return Err(XtaskError::WrongKeySchema {
                table: table.to_string(),
                reason: reason.clone(),
            });
        }
    }

    if !out.confirm("Create it?", true)? {
        return Err(XtaskError::Aborted);
    }
    aws::create(&client, table).await?;
    out.say("waiting for the table to become ACTIVE...");
    aws::wait_until_active(&client, table).await?;
    out.say_in(Tone::Added, format!("{table} is ready"));
    Ok(())
}

pub async fn down(table: &str, out: &Output) -> Result<()> {
    let (client, target) = aws::connect().await;
    out.say(format!("{} {target}", header("target")));

    let step = plan::plan_down(aws::describe(&client, table).await?.as_ref());
    if step == Down::Absent {
        out.say_in(Tone::Unchanged, step.summary(table));
        return Ok(());
    }
    out.say_in(Tone::Removed, step.summary(table));

    if !out.confirm("Delete it? This cannot be undone", false)? {
        return Err(XtaskError::Aborted);
    }
    aws::delete(&client, table).await?;
    out.say_in(Tone::Removed, format!("{table} deleted"));
    Ok(())
}

pub async fn seed(table: &str, count: u32, all: bool, out: &Output) -> Result<()> {
    let (client, target) = aws::connect().await;
    out.say(format!("{} {target}", header("target")));

    if aws::describe(&client, table).await?.is_none() {
        return Err(XtaskError::MissingTable(table.to_string()));
    }

    let tasks = seed::sample_tasks(count, chrono::Utc::now(), &mut rand::rng());
    let shown = if all { tasks.len() } else { PREVIEW };
    for task in tasks.iter().take(shown) {
        out.say(format!("  {} {} [{}]", task.id, task.content, task.status));
    }
    if tasks.len() > shown {
        out.say(format!("  and {} more", tasks.len() - shown));
    }

    if !out.confirm(&format!("Insert {} tasks into {table}?", tasks.len()), true)? {
        return Err(XtaskError::Aborted);
    }
    let inserted = seed::insert(&client, table, &tasks).await?;
    out.say_in(Tone::Added, format!("inserted {inserted} tasks"));
    Ok(())
}

fn header(label: &str) -> String {
    crate::output::tint(Tone::Heading, format!("{label}:"))
}
