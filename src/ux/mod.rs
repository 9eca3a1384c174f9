use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::wire::{ContentIdea, Difficulty, GenerationResult};

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn difficulty_label(d: Difficulty) -> colored::ColoredString {
    match d {
        Difficulty::Easy => "easy".green(),
        Difficulty::Medium => "medium".yellow(),
        Difficulty::Hard => "hard".red(),
    }
}

pub fn render_idea(n: usize, idea: &ContentIdea) -> String {
    let star = if idea.is_favorite { "★".yellow().to_string() } else { " ".to_string() };
    let mut out = format!("{n:>2}. {star} {}  {}\n", idea.title.bold(), format!("[{}]", idea.id).dimmed());
    out.push_str(&format!("      {}\n", idea.description));

    let mut meta = Vec::new();
    if let Some(p) = &idea.platform {
        meta.push(p.cyan().to_string());
    }
    if let Some(f) = &idea.format {
        meta.push(f.magenta().to_string());
    }
    if let Some(d) = idea.difficulty {
        meta.push(difficulty_label(d).to_string());
    }
    if let Some(t) = &idea.time_to_create {
        meta.push(format!("~{t}"));
    }
    if let Some(tags) = idea.tags.as_ref().filter(|t| !t.is_empty()) {
        meta.push(tags.iter().map(|t| format!("#{t}")).collect::<Vec<_>>().join(" "));
    }
    if !meta.is_empty() {
        out.push_str(&format!("      {}\n", meta.join("  ")));
    }
    out
}

pub fn print_result(result: &GenerationResult) {
    match result {
        GenerationResult::Ideas { ideas } => {
            println!("\n=== IDEAS ({}) ===", ideas.len());
            for (i, idea) in ideas.iter().enumerate() {
                print!("{}", render_idea(i + 1, idea));
            }
        }
        GenerationResult::Categories { categories, extra_ideas } => {
            for c in categories {
                println!("\n=== {} ({}) ===", c.category_name.bold(), c.ideas.len());
                for (i, idea) in c.ideas.iter().enumerate() {
                    print!("{}", render_idea(i + 1, idea));
                }
            }
            if !extra_ideas.is_empty() {
                println!("\n=== {} ({}) ===", "More ideas".bold(), extra_ideas.len());
                for (i, idea) in extra_ideas.iter().enumerate() {
                    print!("{}", render_idea(i + 1, idea));
                }
            }
        }
    }
    println!();
}
