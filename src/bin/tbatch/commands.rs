use crate::cli::Commands;
use tbatch::config::Config;

mod completions;
mod history;
mod list;
mod new;
mod show;
mod submit;

pub async fn handle_commands(config: &Config, commands: Commands) -> anyhow::Result<()> {
    match commands {
        Commands::Submit(submit_args) => submit::handle_submit(config, submit_args).await,
        Commands::Show(show_args) => show::handle_show(config, show_args),
        Commands::List => list::handle_list(),
        Commands::New(new_args) => new::handle_new(new_args),
        Commands::History(history_args) => history::handle_history(history_args),
        Commands::Completions(completions_args) => {
            completions::handle_completions(completions_args)
        }
    }
}
