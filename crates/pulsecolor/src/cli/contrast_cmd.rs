//! `contrast` subcommand: show the media color adjustment for a color.

use super::{ContrastOutput, Result, format_color, kv, kv_width, parse_color};
use pulsecolor_lib::color::{BLACK, WHITE};
use pulsecolor_lib::contrast::{
    ContrastAdjuster, MEDIA_MIN_CONTRAST, WcagContrast, contrast_ratio, media_color,
};

pub(super) fn cmd_contrast(json: bool, color: &str) -> Result<()> {
    let input = parse_color(color)?;
    let against_black = WcagContrast.adjust_for_contrast(input, BLACK, MEDIA_MIN_CONTRAST);
    let result = media_color(&WcagContrast, input);
    let ratio_black = contrast_ratio(result, BLACK);
    let ratio_white = contrast_ratio(result, WHITE);

    if json {
        let output = ContrastOutput {
            input: format_color(input),
            against_black: format_color(against_black),
            result: format_color(result),
            ratio_black,
            ratio_white,
        };
        let text = serde_json::to_string_pretty(&output)
            .map_err(|e| pulsecolor_lib::PulseColorError::Config(e.to_string()))?;
        println!("{text}");
        return Ok(());
    }

    let w = kv_width(
        &["Input:", "Against black:", "Result:", "vs black:", "vs white:"],
        &[],
    );
    kv("Input:", format_color(input), w);
    kv("Against black:", format_color(against_black), w);
    kv("Result:", format_color(result), w);
    kv("vs black:", format_args!("{ratio_black:.2}:1"), w);
    kv("vs white:", format_args!("{ratio_white:.2}:1"), w);
    Ok(())
}
