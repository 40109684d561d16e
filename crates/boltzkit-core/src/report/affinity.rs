use crate::core::models::affinity::{AffinityEstimate, AffinityRecord, HIGH_PROBABILITY_COLOR};
use crate::core::utils::html::escape;
use std::f64::consts::PI;

pub const AFFINITY_STYLES: &str = r#"
    .affinity-container { display: grid; grid-template-columns: repeat(3, 1fr); gap: 20px; margin-bottom: 25px; }
    .affinity-card { background: #ffffff; border: 1px solid #0A9CEB; border-radius: 12px; padding: 18px; text-align: center; }
    .affinity-card h3 { margin: 0 0 10px 0; font-size: 1.2em; }
    .affinity-card h4 { color: #0A9CEB; font-weight: 500; margin: 10px 0; }
    .affinity-card .assessment { color: #2f2f2f; font-style: italic; }
    .affinity-card .divider { border-top: 2px dashed #F3F3F3; margin: 16px 0; }
    .affinity-card .metric { font-size: 1.05em; margin: 6px 0; }
    .affinity-card .metric.primary { font-weight: 700; }
    .gauge { display: flex; align-items: center; gap: 8px; justify-content: center; margin-top: 12px; color: #2f2f2f; }
    .gauge-track { width: 60%; height: 10px; background: #F3F3F3; border-radius: 5px; overflow: hidden; }
    .gauge-fill { height: 100%; border-radius: 5px; }
"#;

const DONUT_RADIUS: f64 = 48.0;

fn donut(estimate: &AffinityEstimate) -> String {
    let circumference = 2.0 * PI * DONUT_RADIUS;
    let filled = estimate.probability.clamp(0.0, 1.0) * circumference;
    format!(
        r##"<svg width="140" height="140" viewBox="0 0 140 140" role="img" aria-label="binding probability">
        <circle cx="70" cy="70" r="{r}" fill="none" stroke="#F3F3F3" stroke-width="14"/>
        <circle cx="70" cy="70" r="{r}" fill="none" stroke="{color}" stroke-width="14" stroke-linecap="round"
            stroke-dasharray="{filled:.2} {circumference:.2}" transform="rotate(-90 70 70)"/>
        <text x="70" y="77" text-anchor="middle" font-size="20" font-weight="bold">{percent:.1}%</text>
    </svg>"##,
        r = DONUT_RADIUS,
        color = estimate.color(),
        filled = filled,
        circumference = circumference,
        percent = estimate.probability * 100.0,
    )
}

fn card(estimate: &AffinityEstimate) -> String {
    format!(
        r#"<div class="affinity-card">
    <h3>{title}</h3>
    <h4>Hit Discovery</h4>
    {donut}
    <div class="assessment">{prob_label}</div>
    <div class="divider"></div>
    <h4>Lead Optimization</h4>
    <div class="metric">log<sub>10</sub>(IC<sub>50</sub>): {log_affinity:.3}</div>
    <div class="metric primary">Predicted IC<sub>50</sub>: {ic50:.2} &micro;M</div>
    <div class="metric">&Delta;G: {delta_g:.2} kcal/mol</div>
    <div class="gauge">
        <span>Strong</span>
        <div class="gauge-track"><div class="gauge-fill" style="width: {fill:.1}%; background: {color};"></div></div>
        <span>Weak</span>
    </div>
    <div class="assessment">{affinity_label}</div>
</div>
"#,
        title = escape(estimate.title),
        donut = donut(estimate),
        prob_label = estimate.probability_bucket().label(),
        log_affinity = estimate.log_affinity,
        ic50 = estimate.ic50_um(),
        delta_g = estimate.delta_g(),
        fill = estimate.gauge_fill() * 100.0,
        color = estimate.color(),
        affinity_label = escape(estimate.affinity_bucket().label()),
    )
}

pub fn render_section(job_name: &str, record: &AffinityRecord) -> String {
    let cards: String = record.estimates().iter().map(card).collect();
    format!(
        r#"<div class="dashboard-header">
    <h2 style="color: {title_color};">Affinity Result: {job}</h2>
    <p>
        Binding affinity predictions from the ensemble model and its individual components.
        The report includes Hit Discovery Potential (probability of binding) and Lead Optimization
        metrics (predicted IC<sub>50</sub> and &Delta;G). Lower IC<sub>50</sub> and more negative
        &Delta;G values suggest stronger binding.
    </p>
</div>
<div class="affinity-container">
{cards}</div>
"#,
        title_color = HIGH_PROBABILITY_COLOR,
        job = escape(job_name),
        cards = cards,
    )
}
