//! 結果のコンソール表示

use crate::analytics::WatchTimeStats;
use std::io::{self, Write};

pub fn print_results<W: Write>(stats: &WatchTimeStats, out: &mut W) -> io::Result<()> {
    let time = stats.format_time();
    let rule = "=".repeat(50);

    writeln!(out, "\n{}", rule)?;
    writeln!(out, "YOUTUBE WATCH TIME STATISTICS")?;
    writeln!(out, "{}", rule)?;

    writeln!(out, "\nTotal Watch Time:")?;
    writeln!(out, "   Formatted: {}", time.formatted)?;
    writeln!(out, "   Years:     {:.2}", time.years)?;
    writeln!(out, "   Months:    {:.2}", time.months)?;
    writeln!(out, "   Days:      {:.2}", time.days)?;
    writeln!(out, "   Hours:     {:.2}", time.hours)?;
    writeln!(out, "   Minutes:   {:.2}", time.minutes)?;
    writeln!(out, "   Seconds:   {:.0}", time.seconds)?;

    writeln!(out, "\nVideo Statistics:")?;
    writeln!(out, "   Total videos in history: {}", stats.total_videos)?;
    writeln!(out, "   Deleted videos:          {}", stats.deleted_videos)?;
    writeln!(out, "   Skipped videos:          {}", stats.skipped_videos)?;
    writeln!(out, "   Processed videos:        {}", stats.processed_videos())?;

    Ok(())
}
