//! Output contract: the JSON document written for each scraped channel.

use serde_json::{json, Value};
use tubescrape::storage::{report_file_name, save_report_at};
use tubescrape::{ChannelInfo, ChannelReport, VideoRecord};

fn sample_report() -> ChannelReport {
    ChannelReport {
        main: Some(ChannelInfo {
            channel_name: "Example Channel".to_string(),
            verified: true,
            subscribers: Some("1.2M subscribers".to_string()),
            description: Some("Weekly uploads".to_string()),
            created_at: Some("Joined Mar 4, 2011".to_string()),
            views: Some("98,765,432 views".to_string()),
        }),
        videos: vec![
            VideoRecord {
                title: Some("Newest".to_string()),
                thumbnail: Some("https://i.ytimg.com/vi/a/hq.jpg".to_string()),
                url: Some("/watch?v=a".to_string()),
                views: Some("10K views".to_string()),
                upload_date: Some("1 day ago".to_string()),
            },
            VideoRecord {
                title: Some("Older".to_string()),
                url: Some("/watch?v=b".to_string()),
                ..Default::default()
            },
        ],
    }
}

#[test]
fn report_serializes_with_main_and_videos_keys() {
    let value = serde_json::to_value(sample_report()).unwrap();

    assert_eq!(
        value["main"],
        json!({
            "channelName": "Example Channel",
            "verified": true,
            "subscribers": "1.2M subscribers",
            "description": "Weekly uploads",
            "createdAt": "Joined Mar 4, 2011",
            "views": "98,765,432 views"
        })
    );
    assert_eq!(value["videos"][0]["uploadDate"], "1 day ago");
    assert_eq!(value["videos"][1]["thumbnail"], Value::Null);
    assert_eq!(value["videos"].as_array().unwrap().len(), 2);
}

#[test]
fn missing_channel_serializes_as_null_main() {
    let report = ChannelReport {
        main: None,
        videos: Vec::new(),
    };

    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value, json!({ "main": null, "videos": [] }));
    assert_eq!(report_file_name(report.channel_name(), 7), "unknown-channel-7.json");
}

#[tokio::test]
async fn saved_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let report = sample_report();

    let path = save_report_at(dir.path(), &report, 1_700_000_000_000)
        .await
        .unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "Example Channel-1700000000000.json"
    );
    let contents = std::fs::read_to_string(&path).unwrap();
    let parsed: ChannelReport = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed, report);
}
