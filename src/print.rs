use stanza::style::HAlign::Left;
use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Col, Row, Table};

use crate::bucket::WinBucket;
use crate::summary::Summary;

fn optional_count(count: Option<u32>) -> String {
    count.map(|count| count.to_string()).unwrap_or_default()
}

/// One row per matchup, keyed by the first bucket of its series.
pub fn tabulate_summaries(entries: &[(&WinBucket, &Summary)]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(6)).with(Left)),
            Col::new(Styles::default().with(Separator(true)).with(MinWidth(6)).with(Left)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(
                Styles::default()
                    .with(Separator(true))
                    .with(MinWidth(16))
                    .with(HAlign::Centred),
            ),
            Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Character".into(),
                "Against".into(),
                "Matchup".into(),
                "P(win)".into(),
                "Credible".into(),
                "Games".into(),
                "Played".into(),
                "Opp.".into(),
            ],
        ));
    for (first, summary) in entries {
        let (estimate, credible) = if summary.has_data {
            (summary.point_label(), summary.interval_label())
        } else {
            ("?".to_string(), "".to_string())
        };
        table.push_row(Row::new(
            Styles::default(),
            vec![
                first.c1.clone().into(),
                first.c2.clone().into(),
                estimate.into(),
                format!("{:.3}", summary.point_estimate).into(),
                credible.into(),
                first.count.to_string().into(),
                optional_count(first.player_count).into(),
                optional_count(first.opponent_count).into(),
            ],
        ));
    }
    table
}

/// The full distribution of a single series.
pub fn tabulate_buckets(series: &[WinBucket]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec!["Matchup".into(), "Win".into(), "Mass".into(), "Density".into()],
        ));
    for bucket in series {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                bucket.label.clone().into(),
                format!("{:.2}", bucket.win_chance).into(),
                format!("{:.6}", bucket.probability).into(),
                format!("{:.6}", bucket.pdf).into(),
            ],
        ));
    }
    table
}
