//! Scripted walkthroughs of each demo, printed frame by frame.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;

use crate::demos::{mock_items, CatalogDemo, CounterDemo, Frame, NestedDemo};
use crate::scope::ScopeRegistry;

fn print_frame(out: &mut impl Write, step: &str, frame: &Frame) -> Result<()> {
    writeln!(out, "== {}", step)?;
    write!(out, "{}", frame)?;
    writeln!(out)?;
    Ok(())
}

/// Parent refreshes rebuild the shared child; the owned child keeps its
/// count and its first subtitle.
pub fn run_counter(out: &mut impl Write) -> Result<()> {
    let mut demo = CounterDemo::new(ScopeRegistry::new());
    print_frame(out, "initial", &demo.render()?)?;

    demo.increment_observed()?;
    demo.increment_owned()?;
    print_frame(out, "increment both children", &demo.render()?)?;

    demo.increment_parent()?;
    print_frame(out, "increment parent", &demo.render()?)?;

    demo.set_subtitle("Edited")?;
    print_frame(out, "edit subtitle", &demo.render()?)?;

    writeln!(out, "view models constructed: {}", demo.constructions())?;
    Ok(())
}

/// Load, reorder, then retitle the sentinel item behind its cell's back.
pub async fn run_catalog(out: &mut impl Write, delay: Duration, debug: bool) -> Result<()> {
    let mut demo = CatalogDemo::new(ScopeRegistry::new(), mock_items(), delay)?;
    demo.set_debug(debug);

    let pending = demo.load_items();
    tokio::pin!(pending);
    // Poll once so the load enters Loading before the first frame.
    let mut finished = false;
    tokio::select! {
        biased;
        result = &mut pending => {
            result?;
            finished = true;
        }
        _ = std::future::ready(()) => {}
    }
    print_frame(out, "loading", &demo.render()?)?;
    if !finished {
        pending.await?;
    }
    print_frame(out, "loaded", &demo.render()?)?;

    demo.move_items(&[0], 3)?;
    print_frame(out, "move first item down two rows", &demo.render()?)?;

    demo.randomize()?;
    print_frame(out, "randomize sentinel", &demo.render()?)?;
    Ok(())
}

/// Load the child and show whether the parent header noticed.
pub async fn run_nested(out: &mut impl Write, delay: Duration, bridged: bool) -> Result<()> {
    let demo = NestedDemo::new(ScopeRegistry::new(), bridged, delay)?;
    print_frame(out, "initial", &demo.frame())?;

    demo.activate().await?;
    print_frame(out, "after load", &demo.frame())?;

    demo.refresh().await?;
    print_frame(out, "after refresh", &demo.frame())?;

    writeln!(
        out,
        "parent renders: {}, child renders: {}",
        demo.parent_renders(),
        demo.child_renders()
    )?;
    Ok(())
}
