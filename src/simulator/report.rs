//! Simulation report generation.

use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of one simulated playthrough.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStats {
    pub infinities: u64,
    pub reached_target: bool,
    pub total_ticks: u64,
    /// Tick of the first big crunch, if any.
    pub first_infinity_tick: Option<u64>,
    pub final_boosts: u64,
    pub total_boosts: u64,
    pub upgrades_bought: u64,
    pub challenges_completed: u64,
    pub infinity_challenges_unlocked: u64,
    pub doomed: bool,
    pub cataclysms: u64,
    pub remnants_earned: f64,
    pub famine_earned: f64,
    pub pestilence_earned: f64,
    pub chaos_earned: f64,
    /// Resets performed, by kind.
    pub resets: BTreeMap<String, u64>,
}

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub runs_completed: u32,
    pub runs_timed_out: u32,

    // Progression
    pub avg_infinities: f64,
    pub avg_ticks_to_first_infinity: Option<f64>,
    pub avg_total_boosts: f64,
    pub avg_upgrades_bought: f64,

    // Challenges
    pub avg_challenges_completed: f64,
    pub avg_infinity_challenges_unlocked: f64,

    // Doom
    pub doomed_runs: u32,
    pub avg_cataclysms: f64,
    pub avg_remnants: f64,
    pub avg_timed_currency: [f64; 3],

    pub reset_totals: BTreeMap<String, u64>,

    // Individual run stats for detailed analysis
    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

fn average(runs: &[RunStats], field: impl Fn(&RunStats) -> f64) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(field).sum::<f64>() / runs.len() as f64
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>, max_ticks: u64) -> Self {
        let num_runs = runs.len() as u32;
        let runs_completed = runs.iter().filter(|r| r.reached_target).count() as u32;
        let runs_timed_out = runs
            .iter()
            .filter(|r| !r.reached_target && r.total_ticks >= max_ticks)
            .count() as u32;

        let crunched: Vec<f64> = runs
            .iter()
            .filter_map(|r| r.first_infinity_tick)
            .map(|tick| tick as f64)
            .collect();
        let avg_ticks_to_first_infinity =
            (!crunched.is_empty()).then(|| crunched.iter().sum::<f64>() / crunched.len() as f64);

        let mut reset_totals = BTreeMap::new();
        for run in &runs {
            for (kind, count) in &run.resets {
                *reset_totals.entry(kind.clone()).or_insert(0) += count;
            }
        }

        Self {
            num_runs,
            runs_completed,
            runs_timed_out,
            avg_infinities: average(&runs, |r| r.infinities as f64),
            avg_ticks_to_first_infinity,
            avg_total_boosts: average(&runs, |r| r.total_boosts as f64),
            avg_upgrades_bought: average(&runs, |r| r.upgrades_bought as f64),
            avg_challenges_completed: average(&runs, |r| r.challenges_completed as f64),
            avg_infinity_challenges_unlocked: average(&runs, |r| {
                r.infinity_challenges_unlocked as f64
            }),
            doomed_runs: runs.iter().filter(|r| r.doomed).count() as u32,
            avg_cataclysms: average(&runs, |r| r.cataclysms as f64),
            avg_remnants: average(&runs, |r| r.remnants_earned),
            avg_timed_currency: [
                average(&runs, |r| r.famine_earned),
                average(&runs, |r| r.pestilence_earned),
                average(&runs, |r| r.chaos_earned),
            ],
            reset_totals,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} completed, {} timed out\n\n",
            self.num_runs, self.runs_completed, self.runs_timed_out
        ));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Avg Infinities:        {:.2}\n",
            self.avg_infinities
        ));
        match self.avg_ticks_to_first_infinity {
            Some(ticks) => report.push_str(&format!("  Avg Ticks to Infinity: {:.0}\n", ticks)),
            None => report.push_str("  Avg Ticks to Infinity: never\n"),
        }
        report.push_str(&format!(
            "  Avg Boosts Bought:     {:.1}\n",
            self.avg_total_boosts
        ));
        report.push_str(&format!(
            "  Avg Upgrades Bought:   {:.1}\n\n",
            self.avg_upgrades_bought
        ));

        report.push_str("── CHALLENGES ───────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Avg Completed:         {:.2}\n",
            self.avg_challenges_completed
        ));
        report.push_str(&format!(
            "  Avg IC Unlocked:       {:.2}\n\n",
            self.avg_infinity_challenges_unlocked
        ));

        report.push_str("── DOOM ─────────────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Doomed Runs:           {}\n",
            self.doomed_runs
        ));
        report.push_str(&format!(
            "  Avg Cataclysms:        {:.1}\n",
            self.avg_cataclysms
        ));
        report.push_str(&format!(
            "  Avg Remnants:          {:.2}\n",
            self.avg_remnants
        ));
        report.push_str(&format!(
            "  Avg Famine/Pest/Chaos: {:.1} / {:.1} / {:.1}\n\n",
            self.avg_timed_currency[0], self.avg_timed_currency[1], self.avg_timed_currency[2]
        ));

        report.push_str("── RESETS ───────────────────────────────────────────────────────\n");
        for (kind, count) in &self.reset_totals {
            report.push_str(&format!("  {:<18} {}\n", kind, count));
        }
        report.push('\n');

        report.push_str("── BALANCE ASSESSMENT ───────────────────────────────────────────\n");
        let completion_rate = if self.num_runs > 0 {
            (self.runs_completed as f64 / self.num_runs as f64) * 100.0
        } else {
            0.0
        };
        report.push_str(&format!("  Completion Rate: {:.1}%\n", completion_rate));
        if self.avg_ticks_to_first_infinity.is_none() && self.num_runs > 0 {
            report.push_str("  ⚠️  No run reached infinity - early game too slow?\n");
        }
        if self.avg_total_boosts < 1.0 && self.num_runs > 0 {
            report.push_str("  ⚠️  Boosts almost never bought - requirements too steep?\n");
        }
        if self.doomed_runs > 0 && self.avg_remnants < 1.0 {
            report.push_str("  ⚠️  Doomed runs earn almost no remnants\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
