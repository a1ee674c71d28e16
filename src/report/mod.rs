//! Plain-text and Markdown rendering of analysis results.
//!
//! Everything here is presentation: no numbers are computed beyond
//! formatting and simple sums of already-aggregated rows.

use std::fmt::{self, Write};

use tracing::warn;

use crate::models::{
    DefenseContributor, LeaderStat, ParticipationReport, PlayerAttackSummary, PlayerComparison,
    PlayerDetails, PlayerParticipation, SquadStat, TwSummary,
};

const WIDE: usize = 120;

/// Render into a fresh buffer.
fn render(write: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    if let Err(err) = write(&mut out) {
        warn!("report rendering stopped early: {}", err);
    }
    out
}

fn rule(out: &mut String, ch: char) {
    out.push_str(&ch.to_string().repeat(WIDE));
    out.push('\n');
}

fn banner(out: &mut String, title: &str) {
    rule(out, '=');
    out.push_str(title);
    out.push('\n');
    rule(out, '=');
    out.push('\n');
}

/// Group digits with commas, rounding to a whole number.
pub fn thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Attack summary table for one guild.
pub fn attack_summary_table(guild_name: &str, rows: &[PlayerAttackSummary]) -> String {
    render(|out| {
        banner(
            out,
            &format!("TERRITORY WAR ATTACK SUMMARY - {}", guild_name.to_uppercase()),
        );

        let total_banners = rows
            .iter()
            .fold(0u32, |sum, r| sum.saturating_add(r.total_banners));
        let total_wins: u32 = rows.iter().map(|r| r.wins).sum();
        writeln!(out, "Total Attacks: {}", total_wins)?;
        if rows.is_empty() {
            out.push_str("No attacks found.\n");
            return Ok(());
        }
        writeln!(out, "Unique Players: {}", rows.len())?;
        writeln!(out, "Total Banners: {}\n", total_banners)?;

        writeln!(
            out,
            "{:<25} | {:>9} | {:>7} | {:>11} | {:>13}",
            "Player", "Attacks", "Banners", "Avg Banners", "Avg Power"
        )?;
        rule(out, '-');
        for row in rows {
            writeln!(
                out,
                "{:<25} | {:>9} | {:>7} | {:>11.1} | {:>13}",
                row.attacker_name,
                row.attacks,
                row.total_banners,
                row.avg_banners,
                thousands(row.avg_squad_power)
            )?;
        }
        Ok(())
    })
}

/// Leader matchup table.
pub fn leader_table(title: &str, leaders: &[LeaderStat], note: &str) -> String {
    render(|out| {
        banner(out, title);
        if leaders.is_empty() {
            out.push_str("No leader data.\n");
            return Ok(());
        }

        writeln!(
            out,
            "{:<30} | {:>8} | {:>5} | {:>5} | {:>8} | {:>9} | {:>12}",
            "Leader", "Attempts", "Wins", "Holds", "Win Rate", "Hold Rate", "Avg Banners"
        )?;
        rule(out, '-');
        for leader in leaders {
            writeln!(
                out,
                "{:<30} | {:>8} | {:>5} | {:>5} | {:>7.1}% | {:>8.1}% | {:>12.1}",
                leader.leader,
                leader.total_attempts,
                leader.wins,
                leader.holds,
                leader.win_rate,
                leader.hold_rate,
                leader.avg_banners_on_wins
            )?;
        }
        if !note.is_empty() {
            out.push('\n');
            out.push_str(note);
            out.push('\n');
        }
        Ok(())
    })
}

/// Per-squad (defender and leader) matchup table.
pub fn squad_table(title: &str, squads: &[SquadStat]) -> String {
    render(|out| {
        banner(out, title);
        if squads.is_empty() {
            out.push_str("No squad data.\n");
            return Ok(());
        }

        writeln!(
            out,
            "{:<25} | {:<30} | {:>8} | {:>5} | {:>5} | {:>8} | {:>9} | {:>12}",
            "Player Name", "Leader", "Attempts", "Wins", "Holds", "Win Rate", "Hold Rate", "Avg Banners"
        )?;
        rule(out, '-');
        for squad in squads {
            writeln!(
                out,
                "{:<25} | {:<30} | {:>8} | {:>5} | {:>5} | {:>7.1}% | {:>8.1}% | {:>12.1}",
                squad.defender_name,
                squad.leader,
                squad.total_attempts,
                squad.wins,
                squad.holds,
                squad.win_rate,
                squad.hold_rate,
                squad.avg_banners_on_wins
            )?;
        }
        Ok(())
    })
}

/// Defensive contribution table, capped at `limit` rows.
pub fn defense_table(contributors: &[DefenseContributor], limit: usize) -> String {
    render(|out| {
        banner(out, "DEFENSE CONTRIBUTORS");
        if contributors.is_empty() {
            out.push_str("No defense deployment data found.\n");
            return Ok(());
        }

        let squads: u32 = contributors.iter().map(|c| c.squads_deployed).sum();
        writeln!(out, "Players Who Deployed: {}", contributors.len())?;
        writeln!(out, "Squads Deployed: {}\n", squads)?;
        writeln!(
            out,
            "{:<25} | {:>6} | {:>11} | {:>8} | {:>5} | {:>5} | {:>9} | {:>12}",
            "Player Name", "Squads", "Avg Power", "Attempts", "Wins", "Holds", "Hold Rate", "Banners Lost"
        )?;
        rule(out, '-');
        for c in contributors.iter().take(limit) {
            writeln!(
                out,
                "{:<25} | {:>6} | {:>11} | {:>8} | {:>5} | {:>5} | {:>8.1}% | {:>12}",
                c.player_name,
                c.squads_deployed,
                thousands(c.avg_squad_power),
                c.total_attempts,
                c.wins,
                c.holds,
                c.hold_rate,
                c.banners_given_up
            )?;
        }
        out.push_str("\nPlayers with 0 attempts deployed squads that were never attacked.\n");
        Ok(())
    })
}

fn participation_rows(out: &mut String, players: &[PlayerParticipation]) -> fmt::Result {
    writeln!(
        out,
        "{:<25} | {:>7} | {:>5} | {:>11} | {:>11} | {:>7} | {:>6} | {:>5}",
        "Player Name", "Attacks", "Wins", "Off Banners", "Def Banners", "Total", "Squads", "Holds"
    )?;
    rule(out, '-');
    for p in players {
        writeln!(
            out,
            "{:<25} | {:>7} | {:>5} | {:>11} | {:>11} | {:>7} | {:>6} | {:>5}",
            p.player_name,
            p.attacks,
            p.wins,
            p.offensive_banners,
            p.defensive_banners,
            p.total_banners,
            p.squads_deployed,
            p.defensive_holds
        )?;
    }
    out.push('\n');
    Ok(())
}

/// Participation report with underperformer and non-participant sections.
pub fn participation_text(report: &ParticipationReport, roster_loaded: bool) -> String {
    render(|out| {
        banner(out, "PARTICIPATION REPORT");

        if roster_loaded {
            out.push_str("Guild roster loaded: non-participants are complete.\n\n");
        } else {
            out.push_str("Guild roster not loaded: non-participants limited to players seen in the log.\n\n");
        }

        writeln!(out, "Total Players: {}", report.total_players)?;
        writeln!(out, "Players Who Attacked: {}", report.players_who_attacked)?;
        writeln!(out, "Players Who Deployed Defense: {}", report.players_who_defended)?;
        writeln!(
            out,
            "Minimum Banners Threshold: {}\n",
            report.min_banners_threshold
        )?;

        if report.underperformers.is_empty() {
            writeln!(
                out,
                "No underperformers: every attacker earned at least {} banners.\n",
                report.min_banners_threshold
            )?;
        } else {
            banner(
                out,
                &format!(
                    "UNDERPERFORMERS - attacked but earned fewer than {} banners",
                    report.min_banners_threshold
                ),
            );
            participation_rows(out, &report.underperformers)?;
        }

        if report.non_participants.is_empty() {
            out.push_str("No non-participants.\n\n");
        } else {
            banner(out, "NON-PARTICIPANTS - no attacks and no defense");
            for p in &report.non_participants {
                writeln!(out, "  - {}", p.player_name)?;
            }
            out.push('\n');
        }

        banner(out, "FULL PARTICIPATION TABLE");
        participation_rows(out, &report.all_participants)?;
        Ok(())
    })
}

/// One player's detail card.
pub fn player_details_text(details: &PlayerDetails) -> String {
    render(|out| {
        writeln!(out, "Player: {} ({})", details.name, details.player_id)?;
        writeln!(out, "  Attacks:        {}", details.total_attacks)?;
        writeln!(out, "  Total Banners:  {}", details.total_banners)?;
        writeln!(
            out,
            "  Banners:        avg {:.1}, min {}, max {}",
            details.avg_banners, details.min_banners, details.max_banners
        )?;
        writeln!(out, "  Avg Power:      {}", thousands(details.avg_power))?;
        writeln!(out, "  Efficiency:     {}", details.efficiency_tier)?;
        if !details.zones_attacked.is_empty() {
            out.push_str("  Zones:\n");
            for zone in &details.zones_attacked {
                writeln!(out, "    {:<20} {}", zone.zone_id, zone.attacks)?;
            }
        }
        Ok(())
    })
}

/// Side-by-side comparison table.
pub fn comparison_text(comparison: &PlayerComparison) -> String {
    if !comparison.comparison_found {
        return "No matching players found.\n".to_string();
    }

    render(|out| {
        writeln!(
            out,
            "{:<25} | {:>7} | {:>7} | {:>11} | {:>5} | {:>5} | {:>13} | {:<6}",
            "Player", "Attacks", "Banners", "Avg Banners", "Min", "Max", "Avg Power", "Tier"
        )?;
        rule(out, '-');
        for p in &comparison.players {
            writeln!(
                out,
                "{:<25} | {:>7} | {:>7} | {:>11.1} | {:>5} | {:>5} | {:>13} | {:<6}",
                p.name,
                p.total_attacks,
                p.total_banners,
                p.avg_banners,
                p.min_banners,
                p.max_banners,
                thousands(p.avg_power),
                p.efficiency_tier.to_string()
            )?;
        }
        Ok(())
    })
}

/// Summary overview: guild totals side by side plus top performers.
pub fn summary_text(summary: &TwSummary) -> String {
    render(|out| {
        banner(out, &format!("TERRITORY WAR SUMMARY - {}", summary.guild_name));
        if let Some(snapshot) = &summary.snapshot_id {
            writeln!(out, "Snapshot: {}\n", snapshot)?;
        }

        let ours = &summary.stats;
        let theirs = &summary.opponent_stats;
        writeln!(out, "{:<22} | {:>12} | {:>12}", "Metric", "Our Guild", "Opponent")?;
        rule(out, '-');
        writeln!(
            out,
            "{:<22} | {:>12} | {:>12}",
            "Total Attacks", ours.total_attacks, theirs.total_attacks
        )?;
        writeln!(
            out,
            "{:<22} | {:>12} | {:>12}",
            "Total Banners", ours.total_banners, theirs.total_banners
        )?;
        writeln!(
            out,
            "{:<22} | {:>12.1} | {:>12.1}",
            "Avg Banners/Attack", ours.avg_banners, theirs.avg_banners
        )?;
        writeln!(
            out,
            "{:<22} | {:>12} | {:>12}",
            "Unique Players", ours.unique_players, theirs.unique_players
        )?;
        writeln!(
            out,
            "{:<22} | {:>12} | {:>12}\n",
            "Avg Squad Power",
            thousands(ours.avg_power),
            thousands(theirs.avg_power)
        )?;

        out.push_str("Top Performers\n");
        writeln!(
            out,
            "{:<25} | {:>7} | {:>7} | {:>11} | {:>13}",
            "Player", "Attacks", "Banners", "Avg Banners", "Avg Power"
        )?;
        rule(out, '-');
        for p in &summary.top_performers {
            writeln!(
                out,
                "{:<25} | {:>7} | {:>7} | {:>11.1} | {:>13}",
                p.name,
                p.attacks,
                p.total_banners,
                p.avg_banners,
                thousands(p.avg_power)
            )?;
        }
        Ok(())
    })
}

/// Markdown context block describing one summary.
pub fn context_block(summary: &TwSummary) -> String {
    render(|out| {
        let stats = &summary.stats;
        let opponent = &summary.opponent_stats;

        writeln!(out, "## Guild: {}\n", summary.guild_name)?;

        out.push_str("### Overall Statistics\n");
        writeln!(out, "- Total Attacks: {}", stats.total_attacks)?;
        writeln!(out, "- Total Banners: {}", stats.total_banners)?;
        writeln!(out, "- Unique Players: {}", stats.unique_players)?;
        writeln!(out, "- Average Banners/Attack: {:.1}\n", stats.avg_banners)?;

        writeln!(out, "### Top {} Performers\n", summary.top_performers.len())?;
        out.push_str("| Player | Attacks | Banners | Avg Banners | Avg Power |\n");
        out.push_str("|--------|---------|---------|-------------|-----------|\n");
        for p in &summary.top_performers {
            writeln!(
                out,
                "| {} | {} | {} | {:.1} | {} |",
                p.name,
                p.attacks,
                p.total_banners,
                p.avg_banners,
                thousands(p.avg_power)
            )?;
        }
        out.push('\n');

        out.push_str("### Guild Comparison\n\n");
        out.push_str("| Metric | Our Guild | Opponent |\n");
        out.push_str("|--------|-----------|----------|\n");
        writeln!(
            out,
            "| Total Attacks | {} | {} |",
            stats.total_attacks, opponent.total_attacks
        )?;
        writeln!(
            out,
            "| Total Banners | {} | {} |",
            stats.total_banners, opponent.total_banners
        )?;
        writeln!(
            out,
            "| Avg Banners/Attack | {:.1} | {:.1} |",
            stats.avg_banners, opponent.avg_banners
        )?;
        writeln!(
            out,
            "| Unique Players | {} | {} |\n",
            stats.unique_players, opponent.unique_players
        )?;

        out.push_str(
            "*Per-player lookups and leader, squad and defense breakdowns are available on request.*",
        );
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EfficiencyTier, GuildStats, PlayerPerformance, ZoneCount};

    fn summary() -> TwSummary {
        TwSummary {
            guild_name: "Test Guild".to_string(),
            snapshot_id: None,
            stats: GuildStats {
                total_attacks: 3,
                total_banners: 162,
                unique_players: 2,
                avg_banners: 54.0,
                avg_power: 1234567.0,
            },
            opponent_stats: GuildStats::default(),
            top_performers: vec![PlayerPerformance {
                player_id: "A".to_string(),
                name: "Alice".to_string(),
                total_banners: 122,
                avg_banners: 61.0,
                attacks: 2,
                avg_power: 98765.4,
            }],
            defending_leaders_we_faced: Vec::new(),
            our_defending_leaders: Vec::new(),
            detailed_enemy_squads: Vec::new(),
            detailed_our_squads: Vec::new(),
            defense_contributors: Vec::new(),
            our_attacks: Vec::new(),
            opponent_attacks: Vec::new(),
        }
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.4), "999");
        assert_eq!(thousands(1000.0), "1,000");
        assert_eq!(thousands(98765.4), "98,765");
        assert_eq!(thousands(1234567.0), "1,234,567");
        assert_eq!(thousands(-4500.0), "-4,500");
    }

    #[test]
    fn test_context_block() {
        let block = context_block(&summary());

        assert!(block.starts_with("## Guild: Test Guild\n"));
        assert!(block.contains("- Total Attacks: 3\n"));
        assert!(block.contains("- Average Banners/Attack: 54.0\n"));
        assert!(block.contains("### Top 1 Performers"));
        assert!(block.contains("| Alice | 2 | 122 | 61.0 | 98,765 |"));
        assert!(block.contains("| Total Banners | 162 | 0 |"));
    }

    #[test]
    fn test_empty_tables() {
        assert!(leader_table("LEADERS", &[], "").contains("No leader data."));
        assert!(squad_table("SQUADS", &[]).contains("No squad data."));
        assert!(defense_table(&[], 20).contains("No defense deployment data found."));
        assert!(attack_summary_table("us", &[]).contains("No attacks found."));
        assert_eq!(
            comparison_text(&PlayerComparison::default()),
            "No matching players found.\n"
        );
    }

    #[test]
    fn test_attack_summary_table_large_totals() {
        let row = |name: &str| PlayerAttackSummary {
            attacker_id: name.to_string(),
            attacker_name: name.to_string(),
            wins: 2,
            defeats: 0,
            total_attacks: 2,
            attacks: "2".to_string(),
            total_banners: u32::MAX,
            avg_banners: 60.0,
            avg_squad_power: 120000.0,
        };

        let table = attack_summary_table("us", &[row("Alice"), row("Bob")]);
        assert!(table.contains("Total Attacks: 4"));
        assert!(table.contains(&format!("Total Banners: {}", u32::MAX)));
        assert!(table.contains("120,000"));
    }

    #[test]
    fn test_leader_table_row() {
        let leaders = vec![LeaderStat {
            leader: "GLREY".to_string(),
            total_attempts: 4,
            wins: 3,
            holds: 1,
            win_rate: 75.0,
            hold_rate: 25.0,
            avg_banners_on_wins: 61.333,
        }];
        let table = leader_table("LEADERS", &leaders, "Higher hold rate: harder matchup");

        assert!(table.contains("GLREY"));
        assert!(table.contains("   75.0% |"));
        assert!(table.contains("61.3"));
        assert!(table.ends_with("Higher hold rate: harder matchup\n"));
    }

    #[test]
    fn test_participation_text_sections() {
        let ghost = PlayerParticipation {
            player_name: "Ghost".to_string(),
            ..Default::default()
        };
        let report = ParticipationReport {
            total_players: 1,
            min_banners_threshold: 50,
            non_participants: vec![ghost.clone()],
            all_participants: vec![ghost],
            ..Default::default()
        };

        let text = participation_text(&report, true);
        assert!(text.contains("Guild roster loaded"));
        assert!(text.contains("No underperformers"));
        assert!(text.contains("  - Ghost\n"));
        assert!(text.contains("FULL PARTICIPATION TABLE"));
    }

    #[test]
    fn test_player_details_text() {
        let details = PlayerDetails {
            name: "Alice".to_string(),
            player_id: "A".to_string(),
            total_attacks: 2,
            total_banners: 122,
            avg_banners: 61.0,
            min_banners: 58,
            max_banners: 64,
            avg_power: 50000.0,
            total_power: 100000.0,
            efficiency_tier: EfficiencyTier::High,
            zones_attacked: vec![ZoneCount {
                zone_id: "tw_zone_01".to_string(),
                attacks: 2,
            }],
        };

        let text = player_details_text(&details);
        assert!(text.starts_with("Player: Alice (A)\n"));
        assert!(text.contains("avg 61.0, min 58, max 64"));
        assert!(text.contains("Efficiency:     High"));
        assert!(text.contains("tw_zone_01"));
    }
}
