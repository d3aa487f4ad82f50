use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use ipl_predictor::delivery::{self, Delivery, NONE_SENTINEL};
use ipl_predictor::error::PipelineError;
use ipl_predictor::innings::{InningsSummary, summarize_innings};
use ipl_predictor::pipeline::load_summary_table;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn load_fixture() -> Vec<Delivery> {
    delivery::read_deliveries_from_path(&fixture_path("ipl_sample.csv"))
        .expect("fixture should parse")
}

#[test]
fn reads_fixture_and_fills_sentinels() {
    let rows = load_fixture();
    assert_eq!(rows.len(), 14);

    let first = &rows[0];
    assert_eq!(first.match_id, 1001);
    assert_eq!(first.batting_team, "Chennai Super Kings");
    assert_eq!(first.extra_type, NONE_SENTINEL);
    assert_eq!(first.player_out, NONE_SENTINEL);
    assert_eq!(first.kind, NONE_SENTINEL);
    assert_eq!(first.fielders_involved, NONE_SENTINEL);

    let wicket = &rows[2];
    assert!(wicket.is_wicket);
    assert_eq!(wicket.player_out, "DP Conway");
    assert_eq!(wicket.kind, "caught");
    assert_eq!(wicket.fielders_involved, "Ishan Kishan, sub");

    assert_eq!(rows[5].extra_type, "wides");
}

#[test]
fn summarizes_fixture_per_innings() {
    let table = summarize_innings(&load_fixture());
    let expected = vec![
        InningsSummary {
            match_id: 1001,
            batting_team: "Chennai Super Kings".to_string(),
            innings: 1,
            final_score: 11,
            total_balls: 4,
            wickets_lost: 1,
        },
        InningsSummary {
            match_id: 1001,
            batting_team: "Mumbai Indians".to_string(),
            innings: 2,
            final_score: 3,
            total_balls: 3,
            wickets_lost: 1,
        },
        InningsSummary {
            match_id: 1002,
            batting_team: "Chennai Super Kings".to_string(),
            innings: 2,
            final_score: 12,
            total_balls: 2,
            wickets_lost: 0,
        },
        InningsSummary {
            match_id: 1002,
            batting_team: "Mumbai Indians".to_string(),
            innings: 1,
            final_score: 5,
            total_balls: 5,
            wickets_lost: 0,
        },
    ];
    assert_eq!(table.rows(), expected.as_slice());
}

#[test]
fn runs_are_conserved_and_balls_match_row_counts() {
    let rows = load_fixture();
    let table = summarize_innings(&rows);

    let input_runs: u64 = rows.iter().map(|d| u64::from(d.total_run)).sum();
    assert_eq!(table.total_runs(), input_runs);

    for summary in table.rows() {
        let contributing = rows
            .iter()
            .filter(|d| {
                d.match_id == summary.match_id
                    && d.batting_team == summary.batting_team
                    && d.innings == summary.innings
            })
            .count();
        assert_eq!(summary.total_balls as usize, contributing);
        assert!(summary.wickets_lost <= summary.total_balls);
    }
}

#[test]
fn aggregation_is_repeatable() {
    let rows = load_fixture();
    assert_eq!(summarize_innings(&rows), summarize_innings(&rows));
}

#[test]
fn stream_and_path_sources_agree() {
    let raw = fs::read(fixture_path("ipl_sample.csv")).expect("fixture should be readable");
    let from_stream = load_summary_table(Cursor::new(raw)).expect("stream should parse");
    assert_eq!(from_stream, summarize_innings(&load_fixture()));
}

#[test]
fn two_ball_innings_example() {
    let csv = "\
ID,BattingTeam,innings,total_run,isWicketDelivery,extra_type,player_out,kind,fielders_involved
1,A,1,4,0,,,,
1,A,1,5,0,,,,
";
    let table = load_summary_table(csv.as_bytes()).expect("csv should parse");
    assert_eq!(
        table.rows(),
        &[InningsSummary {
            match_id: 1,
            batting_team: "A".to_string(),
            innings: 1,
            final_score: 9,
            total_balls: 2,
            wickets_lost: 0,
        }]
    );
}

#[test]
fn missing_columns_fail_fast() {
    let csv = "ID,BattingTeam,innings,runs\n1,A,1,4\n";
    let err = load_summary_table(csv.as_bytes()).expect_err("schema should be rejected");
    match err {
        PipelineError::Schema { missing } => {
            assert_eq!(
                missing,
                vec![
                    "total_run",
                    "isWicketDelivery",
                    "extra_type",
                    "player_out",
                    "kind",
                    "fielders_involved"
                ]
            );
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn empty_input_is_a_schema_error() {
    let err = load_summary_table("".as_bytes()).expect_err("no header means no schema");
    assert!(matches!(err, PipelineError::Schema { .. }));
}

#[test]
fn unparseable_runs_report_row_and_column() {
    let csv = "\
ID,BattingTeam,innings,total_run,isWicketDelivery,extra_type,player_out,kind,fielders_involved
1,A,1,4,0,,,,
1,A,1,four,0,,,,
";
    let err = load_summary_table(csv.as_bytes()).expect_err("bad run value");
    match err {
        PipelineError::InvalidValue { row, column, value } => {
            assert_eq!(row, 2);
            assert_eq!(column, "total_run");
            assert_eq!(value, "four");
        }
        other => panic!("expected invalid value, got {other:?}"),
    }
}

#[test]
fn innings_beyond_two_pass_through() {
    let csv = "\
ID,BattingTeam,innings,total_run,isWicketDelivery,extra_type,player_out,kind,fielders_involved
7,A,3,1,0,,,,
7,A,3,1,1,,B,bowled,
";
    let table = load_summary_table(csv.as_bytes()).expect("csv should parse");
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].innings, 3);
    assert_eq!(table.rows()[0].wickets_lost, 1);
}

#[test]
fn team_names_differing_by_whitespace_stay_separate() {
    let csv = "\
ID,BattingTeam,innings,total_run,isWicketDelivery,extra_type,player_out,kind,fielders_involved
1,Mumbai Indians ,1,4,0,,,,
2,Mumbai Indians,1,5,0, wides ,,,
";
    let rows = delivery::read_deliveries(csv.as_bytes()).expect("csv should parse");
    assert_eq!(rows[0].batting_team, "Mumbai Indians ");
    assert_eq!(rows[1].extra_type, " wides ");

    let table = summarize_innings(&rows);
    assert_eq!(table.teams(), vec!["Mumbai Indians", "Mumbai Indians "]);
    assert_eq!(table.len(), 2);
}

#[test]
fn padded_numeric_cells_still_parse() {
    let csv = "\
ID,BattingTeam,innings,total_run,isWicketDelivery,extra_type,player_out,kind,fielders_involved
 3 ,A, 1 , 6 , 1 ,,,,
";
    let rows = delivery::read_deliveries(csv.as_bytes()).expect("csv should parse");
    assert_eq!(rows[0].match_id, 3);
    assert_eq!(rows[0].innings, 1);
    assert_eq!(rows[0].total_run, 6);
    assert!(rows[0].is_wicket);
}

#[test]
fn rows_without_batting_team_are_left_out() {
    let csv = "\
ID,BattingTeam,innings,total_run,isWicketDelivery,extra_type,player_out,kind,fielders_involved
1,A,1,4,0,,,,
1,,1,6,0,,,,
1,NA,1,1,1,,B,bowled,
1,A,1,2,0,N/A,NULL,#N/A,<NA>
";
    let rows = delivery::read_deliveries(csv.as_bytes()).expect("csv should parse");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[3].extra_type, NONE_SENTINEL);
    assert_eq!(rows[3].player_out, NONE_SENTINEL);
    assert_eq!(rows[3].kind, NONE_SENTINEL);
    assert_eq!(rows[3].fielders_involved, NONE_SENTINEL);

    let table = summarize_innings(&rows);
    assert_eq!(table.teams(), vec!["A"]);
    assert_eq!(
        table.rows(),
        &[InningsSummary {
            match_id: 1,
            batting_team: "A".to_string(),
            innings: 1,
            final_score: 6,
            total_balls: 4,
            wickets_lost: 0,
        }]
    );
}
