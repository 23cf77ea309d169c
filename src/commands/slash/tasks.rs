//! # Task Commands
//!
//! `/add_task` and `/list_tasks` definitions.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_add_task_command(), create_list_tasks_command()]
}

fn create_add_task_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("add_task")
        .description("課題の通知を登録します")
        .create_option(|option| {
            option
                .name("task_name")
                .description("課題の名前")
                .kind(CommandOptionType::String)
                .required(true)
                .min_length(1)
                .max_length(200)
        })
        .create_option(|option| {
            option
                .name("deadline")
                .description("締切日時 (例: 2024-05-20 23:59)")
                .kind(CommandOptionType::String)
                .required(true)
                .max_length(32)
        })
        .create_option(|option| {
            option
                .name("notify_before")
                .description("通知タイミング (例: 1日, 3時間, 1日2時間)")
                .kind(CommandOptionType::String)
                .required(true)
                .max_length(64)
        });
    command
}

fn create_list_tasks_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command.name("list_tasks").description("自分の課題一覧");
    command
}
