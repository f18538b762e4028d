//! Prompt construction for the report image request.
//!
//! Pure formatting: the layout, aspect ratio, and color theme the model is
//! asked for are fixed; only the player's values are interpolated. Nothing
//! here touches the network or the filesystem.

use crate::session::PlayerProfile;

/// Primary accent color of the report theme (mint green).
pub const THEME_COLOR_HEX: &str = "#008F53";

const MISSING_METRIC: &str = "50";
const MISSING_STAT: &str = "???";
const MISSING_STOCK: &str = "-";
const MISSING_RETURN: &str = "0";

/// Builds the full generation prompt for a matched player.
pub fn build_report_prompt(profile: &PlayerProfile) -> String {
    let record = &profile.record;

    let radar_power = text_or(record.trading_volume.as_deref(), MISSING_METRIC);
    let radar_defense = text_or(record.stability_score.as_deref(), MISSING_METRIC);
    let radar_contact = text_or(record.diversification.as_deref(), MISSING_METRIC);
    let radar_speed = text_or(record.trading_frequency.as_deref(), MISSING_METRIC);
    let radar_global = text_or(record.global_share_ratio.as_deref(), MISSING_METRIC);

    let avg = text_or(record.avg_return.as_deref(), MISSING_STAT);
    let ops = text_or(record.ops_activity.as_deref(), MISSING_STAT);
    let era = text_or(record.era_stability.as_deref(), MISSING_STAT);

    let stock1 = text_or(record.stock1.as_deref(), MISSING_STOCK);
    let ret1 = text_or(record.stock1_return.as_deref(), MISSING_RETURN);
    let stock2 = text_or(record.stock2.as_deref(), MISSING_STOCK);
    let ret2 = text_or(record.stock2_return.as_deref(), MISSING_RETURN);
    let stock3 = text_or(record.stock3.as_deref(), MISSING_STOCK);
    let ret3 = text_or(record.stock3_return.as_deref(), MISSING_RETURN);

    format!(
        r#"You are an expert UI/UX designer for fintech & sports infographics.

[Task]
Generate a **"2025 YIPP X KBO AI Investment Report"** image, optimized for Instagram Story (9:16 Aspect Ratio).

[Design Style]
- **Theme Color**: Use Mint Green ({theme}) as the primary accent color.
- **Style**: Modern, clean, sleek, and data-driven infographic style.
- **Layout**: Vertical layout (9:16).

[Content to Visualize]
1. **Header**:
   - Title: "2025 YIPP AI Investment Report"
   - Subtitle: "Player Analysis: {name}"

2. **Player Profile (Top Section)**:
   - Visual: A high-quality illustration of a baseball player wearing the **"{team}"** uniform.
   - Back View: Show the player's back with Name **"{name}"** and Number **"{number}"**.
   - Position Tag: Display **"{position}"** prominently.

3. **Investment Radar (Middle Section)**:
   - Draw a pentagon radar chart with these 5 axes (Scale 0-100):
     - Trading Volume (거래금액): {radar_power}
     - Stability (안정성): {radar_defense}
     - Diversification (분산투자): {radar_contact}
     - Frequency (거래빈도): {radar_speed}
     - Global Share (해외비중): {radar_global}

4. **Key Metrics (Baseball Stats)**:
   - AVG (Return): **{avg}**
   - OPS (Activity): **{ops}**
   - ERA (Stability): **{era}**

5. **Top 3 Profit Stocks (Bottom Section - IMPORTANT)**:
   - Display a "Hall of Fame" or "Top Picks" list for this player.
   - 1st: **{stock1}** (+{ret1}%) -> Highlight this one (Gold/Best).
   - 2nd: **{stock2}** (+{ret2}%)
   - 3rd: **{stock3}** (+{ret3}%)

[Output Requirement]
- Output ONLY the generated image.
- Aspect Ratio: 9:16 (Vertical).
- Ensure Korean text (Names, Stocks) is legible and not broken.
"#,
        theme = THEME_COLOR_HEX,
        name = profile.name,
        team = profile.team,
        number = profile.jersey_number,
        position = profile.position.label(),
        radar_power = radar_power,
        radar_defense = radar_defense,
        radar_contact = radar_contact,
        radar_speed = radar_speed,
        radar_global = radar_global,
        avg = avg,
        ops = ops,
        era = era,
        stock1 = stock1,
        ret1 = ret1,
        stock2 = stock2,
        ret2 = ret2,
        stock3 = stock3,
        ret3 = ret3,
    )
}

/// Short plain-text preview of the investment record, shown above the
/// generated card.
pub fn profile_summary(profile: &PlayerProfile) -> String {
    let record = &profile.record;
    format!(
        "수익률(AVG): {avg}\n\
         TOP 1 종목: {stock1} ({ret1}%)\n\
         TOP 2 종목: {stock2} ({ret2}%)\n\
         TOP 3 종목: {stock3} ({ret3}%)",
        avg = text_or(record.avg_return.as_deref(), MISSING_STOCK),
        stock1 = text_or(record.stock1.as_deref(), MISSING_STOCK),
        ret1 = text_or(record.stock1_return.as_deref(), MISSING_RETURN),
        stock2 = text_or(record.stock2.as_deref(), MISSING_STOCK),
        ret2 = text_or(record.stock2_return.as_deref(), MISSING_RETURN),
        stock3 = text_or(record.stock3.as_deref(), MISSING_STOCK),
        ret3 = text_or(record.stock3_return.as_deref(), MISSING_RETURN),
    )
}

fn text_or<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => default,
    }
}
