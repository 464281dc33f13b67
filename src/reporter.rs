use crate::models::{AdvancedSeoData, MetaReport, MetaTags, MetaValidation, PlatformPreview};
use crate::preview::{self, Platform};
use crate::scorer::max;
use anyhow::Result;
use colored::*;
use serde::Serialize;
use std::fs::File;
use std::io::Write;

/// Meta report plus one preview per platform, as printed by `seolens meta`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaSummary {
    pub meta_tags: MetaTags,
    pub validation: MetaValidation,
    pub previews: Vec<PlatformPreview>,
}

pub struct Reporter;

impl Reporter {
    pub fn generate_meta_summary(report: MetaReport) -> MetaSummary {
        let previews = Platform::ALL
            .iter()
            .map(|platform| preview::preview(&report.meta_tags, *platform))
            .collect();

        MetaSummary {
            meta_tags: report.meta_tags,
            validation: report.validation,
            previews,
        }
    }

    pub fn print_text_report(report: &AdvancedSeoData) {
        let fields = &report.fields;

        println!("\n{}", "=".repeat(80).bright_blue());
        println!("{}", "seolens - SEO Report".bright_cyan().bold());
        println!("{}", "=".repeat(80).bright_blue());
        println!();

        println!("{}: {}", "URL".bright_white().bold(), fields.url);
        println!(
            "{}: {}",
            "Analyzed At".bright_white().bold(),
            report.analyzed_at
        );
        println!();

        println!("{}", "Score".bright_yellow().bold().underline());
        let score = &report.seo_score;
        Self::print_score_line("Meta Tags:  ", score.meta_tags, max::META_TAGS);
        Self::print_score_line("Content:    ", score.content, max::CONTENT);
        Self::print_score_line("Technical:  ", score.technical, max::TECHNICAL);
        Self::print_score_line("Performance:", score.performance, max::PERFORMANCE);
        Self::print_score_line("Social:     ", score.social, max::SOCIAL);
        Self::print_score_line("Overall:    ", score.overall, 100);
        println!();

        println!("{}", "Page".bright_yellow().bold().underline());
        if let Some(title) = &fields.meta_tags.title {
            println!("  Title:        {}", title.bright_white());
        }
        println!(
            "  H1 / H2:      {} / {}",
            fields.headings.h1.len(),
            fields.headings.h2.len()
        );
        println!(
            "  Words:        {} ({}, readability {:.1})",
            fields.content.word_count,
            fields.content.content_length.as_str(),
            fields.content.readability_score
        );
        println!(
            "  Links:        {} total, {} internal, {} external, {} nofollow",
            fields.links.total, fields.links.internal, fields.links.external, fields.links.nofollow
        );
        println!(
            "  Images:       {} total, {} without alt",
            fields.images.total, fields.images.without_alt
        );
        if fields.schema.detected {
            println!(
                "  Schema:       {}{}",
                fields.schema.types.join(", ").bright_green(),
                if fields.schema.valid {
                    String::new()
                } else {
                    " (invalid blocks)".bright_red().to_string()
                }
            );
        }
        println!(
            "  HTML Size:    {} bytes, compression {}",
            fields.performance.html_size,
            Self::yes_no(fields.performance.has_compression)
        );
        println!(
            "  HTTPS:        {}, HSTS {}, mixed content {}",
            Self::yes_no(fields.security.https),
            Self::yes_no(fields.security.hsts),
            if fields.security.mixed_content {
                "yes".bright_red()
            } else {
                "no".bright_green()
            }
        );
        println!();

        Self::print_validation(&report.validation);

        println!();
        println!("{}", "=".repeat(80).bright_blue());
    }

    pub fn print_meta_report(summary: &MetaSummary) {
        println!("\n{}", "=".repeat(80).bright_blue());
        println!("{}", "seolens - Meta Tags".bright_cyan().bold());
        println!("{}", "=".repeat(80).bright_blue());
        println!();

        let meta = &summary.meta_tags;
        let rows = [
            ("Title", &meta.title),
            ("Description", &meta.description),
            ("Canonical", &meta.canonical),
            ("Image", &meta.image),
            ("Site Name", &meta.site_name),
            ("Twitter Card", &meta.twitter_card),
        ];
        for (label, value) in rows {
            println!(
                "  {:<13} {}",
                format!("{}:", label).bright_white().bold(),
                value
                    .as_deref()
                    .map(|v| v.normal())
                    .unwrap_or_else(|| "N/A".dimmed())
            );
        }
        println!();

        println!("{}", "Previews".bright_yellow().bold().underline());
        for preview in &summary.previews {
            println!();
            println!("  {}", preview.platform.bright_cyan().bold());
            println!("    {}", preview.domain.dimmed());
            println!(
                "    {}{}",
                preview.title.bright_white().bold(),
                if preview.title_truncated { " (truncated)".dimmed() } else { "".normal() }
            );
            println!(
                "    {}{}",
                preview.description,
                if preview.description_truncated {
                    " (truncated)".dimmed()
                } else {
                    "".normal()
                }
            );
            if let Some(image) = &preview.image {
                println!("    {}", image.dimmed());
            }
        }
        println!();

        Self::print_validation(&summary.validation);

        println!();
        println!("{}", "=".repeat(80).bright_blue());
    }

    fn print_validation(validation: &MetaValidation) {
        println!(
            "{} {} ({}/100)",
            "Validation".bright_yellow().bold().underline(),
            if validation.is_valid {
                "passed".bright_green()
            } else {
                "failed".bright_red()
            },
            validation.score
        );
        for error in &validation.errors {
            println!("  [{}] {}", "ERROR".bright_red(), error);
        }
        for warning in &validation.warnings {
            println!("  [{}] {}", "WARN ".yellow(), warning);
        }
        for suggestion in &validation.suggestions {
            println!("  [{}] {}", "INFO ".bright_cyan(), suggestion);
        }
    }

    fn print_score_line(label: &str, value: u32, limit: u32) {
        let ratio = value as f64 / limit as f64;
        let rendered = format!("{:>3}/{}", value, limit);
        let colored = if ratio >= 0.8 {
            rendered.bright_green()
        } else if ratio >= 0.5 {
            rendered.yellow()
        } else {
            rendered.bright_red()
        };
        println!("  {} {}", label, colored);
    }

    fn yes_no(value: bool) -> ColoredString {
        if value {
            "yes".bright_green()
        } else {
            "no".bright_red()
        }
    }

    pub fn save_json_report<T: Serialize>(report: &T, filename: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(filename)?;
        file.write_all(json.as_bytes())?;
        println!("Report saved to: {}", filename.bright_green());
        Ok(())
    }
}
