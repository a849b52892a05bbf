use anyhow::Result;
use clap::Parser;
use sbardata::ElementId;
use sbarview::EditorSession;

mod args;
mod ops;

use args::{Cli, Commands};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let level = std::str::FromStr::from_str(&cli.log_level).unwrap_or(log::LevelFilter::Warn);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    let sbardef = cli.sbardef.as_deref();

    // Listing lumps needs neither a document nor a game state.
    if let Commands::Lumps { filter } = &cli.command {
        let lumps = ops::load_lumps(cli.lumps.as_deref())?;
        print!("{}", ops::list_lumps(&lumps, filter.as_deref()));
        return Ok(());
    }

    let path = ops::require_sbardef(sbardef)?;
    let doc = ops::load_document(path)?;

    match cli.command {
        Commands::Bars => {
            print!("{}", ops::list_bars(&doc));
        }
        Commands::Inspect { id } => {
            print!("{}", ops::inspect(&doc, ElementId(id))?);
        }
        command => {
            let lumps = ops::load_lumps(cli.lumps.as_deref())?;
            let state = ops::load_state(cli.state.as_deref(), &cli.overrides)?;
            let mut session = EditorSession::new(doc, lumps, state);

            match command {
                Commands::Layout { bar } => {
                    session.select_bar(bar)?;
                    print!("{}", ops::describe_layout(&session));
                }
                Commands::Render { bar, output } => {
                    session.select_bar(bar)?;
                    ops::render(&session, &output)?;
                    println!("Wrote {}", output.display());
                }
                Commands::Move { id, x, y, target } => {
                    session.select_bar(target.bar)?;
                    let (x, y) = ops::move_element(&mut session, ElementId(id), (x, y))?;
                    println!("{} now at ({}, {})", ElementId(id), x, y);
                    ops::save(session.document(), &ops::output_path(path, target.output))?;
                }
                Commands::Add {
                    parent,
                    kind,
                    patch,
                    font,
                    max_length,
                    target,
                } => {
                    session.select_bar(target.bar)?;
                    let kind = ops::build_kind(kind, patch, font, max_length)?;
                    let id = ops::add_element(&mut session, parent, kind)?;
                    println!("Added {}", id);
                    ops::save(session.document(), &ops::output_path(path, target.output))?;
                }
                Commands::Remove { id, target } => {
                    session.select_bar(target.bar)?;
                    let removed = ops::remove_element(&mut session, ElementId(id))?;
                    println!("Removed {} ({})", ElementId(id), removed.kind.name());
                    ops::save(session.document(), &ops::output_path(path, target.output))?;
                }
                Commands::Bars | Commands::Inspect { .. } | Commands::Lumps { .. } => {}
            }
        }
    }

    Ok(())
}
