mod draw;
mod list;
mod search;
mod settings;
mod show;

use draw::run_draw;
use list::run_list;
use search::run_search;
use settings::run_settings;
use show::run_show;

use std::path::Path;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context, settings: &Path) -> Result<()> {
    match command {
        Command::Search(args) => run_search(args, ctx, settings),
        Command::Show(args) => run_show(args, ctx, settings),
        Command::List(args) => run_list(args, ctx, settings),
        Command::Draw(args) => run_draw(args, ctx, settings),
        Command::Settings(args) => run_settings(args, ctx, settings),
    }
}
