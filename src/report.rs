use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, Print, PrintStyledContent},
    QueueableCommand,
};

use std::cmp::Ordering;
use std::io::{stdout, Stdout, Write};

use patchwork_advisor::{
    snapshot::Snapshot,
    solver::{Projection, Recommendation},
    track, GameState, Seat, TurnAction,
};

fn name(snapshot: &Snapshot, seat: Seat) -> String {
    match snapshot.player(seat) {
        Some(player) if !player.name.is_empty() => player.name.clone(),
        _ => seat.to_string(),
    }
}

// player colours are reported as hex codes, fall back to white
fn color(snapshot: &Snapshot, seat: Seat) -> Color {
    let rgb = snapshot
        .player(seat)
        .and_then(|player| player.color.as_deref())
        .map(|hex| hex.trim_start_matches('#'))
        .filter(|hex| hex.len() == 6 && hex.is_ascii())
        .and_then(|hex| {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some((channel(0)?, channel(2)?, channel(4)?))
        });
    match rgb {
        Some((r, g, b)) => Color::Rgb { r, g, b },
        None => Color::White,
    }
}

fn print_name(out: &mut Stdout, snapshot: &Snapshot, seat: Seat) -> Result<()> {
    out.queue(PrintStyledContent(
        style(name(snapshot, seat))
            .attribute(Attribute::Bold)
            .with(color(snapshot, seat)),
    ))?;
    Ok(())
}

fn print_score(out: &mut Stdout, score: i32, against: i32) -> Result<()> {
    let background = match score.cmp(&against) {
        Ordering::Greater => Color::Green,
        Ordering::Less => Color::Red,
        Ordering::Equal => Color::Yellow,
    };
    out.queue(PrintStyledContent(
        style(format!(" {} ", score)).on(background).with(Color::Black),
    ))?;
    Ok(())
}

/// Prints both players and the purchasable patches ranked by button rate
pub fn position(snapshot: &Snapshot, state: &GameState) -> Result<()> {
    let mut out = stdout();

    for &seat in [Seat::First, Seat::Second].iter() {
        let ledger = state.ledger(seat);
        print_name(&mut out, snapshot, seat)?;
        out.queue(Print(format!(
            ": buttons {}, income {}, time {}, empty spaces {}, score {}\n",
            ledger.button_count,
            ledger.button_production,
            ledger.location,
            ledger.free_capacity(),
            ledger.score()
        )))?;
    }

    let active = state.active();
    let mut rates = state
        .market()
        .visible()
        .enumerate()
        .map(|(slot, patch)| {
            let rate = patch.button_rate(
                track::remaining_income_phases(active.location),
                track::remaining_time(active.location),
                track::bonus_patch_factor(active.location, patch.time_cost),
            );
            (slot, patch, rate)
        })
        .collect::<Vec<_>>();
    rates.sort_by(|a, b| {
        b.2.unwrap_or(f64::MIN)
            .partial_cmp(&a.2.unwrap_or(f64::MIN))
            .unwrap_or(Ordering::Equal)
    });

    out.queue(Print("\nPatches by button rate:\n"))?;
    for (slot, patch, rate) in rates {
        let affordable = active.can_afford(patch);
        let line = match rate {
            Some(rate) => format!("  {}: {:>6.2}  {}\n", slot + 1, rate, patch),
            None => format!("  {}:      -  {}\n", slot + 1, patch),
        };
        out.queue(PrintStyledContent(style(line).with(if affordable {
            Color::Reset
        } else {
            Color::DarkGrey
        })))?;
    }
    out.queue(Print("\n"))?;
    out.flush()?;
    Ok(())
}

fn print_projection(
    out: &mut Stdout,
    snapshot: &Snapshot,
    projection: &Projection,
) -> Result<()> {
    for &seat in [Seat::First, Seat::Second].iter() {
        print_name(out, snapshot, seat)?;
        out.queue(Print("'s score: "))?;
        print_score(
            out,
            projection.for_seat(seat),
            projection.for_seat(seat.other()),
        )?;
        out.queue(Print("\n"))?;
    }
    Ok(())
}

/// Prints the chosen move, the line behind it and how the other moves compare
pub fn recommendation(
    snapshot: &Snapshot,
    state: &GameState,
    recommendation: &Recommendation,
) -> Result<()> {
    let mut out = stdout();

    out.queue(Print("Best turn choice for "))?;
    print_name(&mut out, snapshot, recommendation.mover)?;
    out.queue(Print(": "))?;
    let choice = match recommendation.action.slot() {
        Some(slot) => match state.market().get(slot) {
            Some(patch) => format!("{}, {}", recommendation.action, patch),
            None => recommendation.action.to_string(),
        },
        None => TurnAction::Advance.to_string(),
    };
    out.queue(PrintStyledContent(style(choice).attribute(Attribute::Bold)))?;
    out.queue(Print("\n"))?;
    print_projection(&mut out, snapshot, &recommendation.projection)?;

    out.queue(Print("\nCalculated path:\n"))?;
    for record in recommendation.line.iter() {
        out.queue(Print("  "))?;
        print_name(&mut out, snapshot, record.mover)?;
        out.queue(Print(format!(
            "'s turn: {} ({}: {}, {}: {})\n",
            record.action,
            name(snapshot, Seat::First),
            record.score_of(Seat::First),
            name(snapshot, Seat::Second),
            record.score_of(Seat::Second),
        )))?;
    }

    out.queue(Print("\nAlternatives:\n"))?;
    for alternative in recommendation.ranked_alternatives() {
        let margin = alternative.projection.margin(recommendation.mover);
        out.queue(Print(format!("  {:<12} ", alternative.action.to_string())))?;
        print_score(&mut out, margin, 0)?;
        out.queue(Print("\n"))?;
    }
    out.queue(Print("\n"))?;
    out.flush()?;
    Ok(())
}
