//! Shared fixtures for integration tests.

use std::path::{Path, PathBuf};

use askdb::config::{Config, Settings, SettingsOverrides};
use askdb::db::SqliteStore;
use askdb::ingest::load_csv;
use tempfile::TempDir;

/// Ten reviews in the shape of the Amazon review export, including the
/// unnamed index column it starts with.
pub const REVIEWS_CSV: &str = "\
,reviewerID,asin,reviewerName,helpful,reviewText,overall,summary,unixReviewTime,reviewTime,day_diff,helpful_yes,total_vote
0,A3SBTW3WS4IQSN,B007WTAJTO,Alice,\"[0, 0]\",No issues.,4.0,Four Stars,1406073600,2014-07-23,138,0,0
1,A18K1ODH1I2MVB,B007WTAJTO,0mie,\"[0, 0]\",\"Purchased this for my device, it worked as advertised.\",5.0,MOAR SPACE!!!,1382659200,2013-10-25,409,0,0
2,A2FII3I2MBMUIA,B007WTAJTO,1K3,\"[0, 0]\",it works as expected. I should have sprung for the higher capacity.,4.0,nothing to really say....,1356220800,2012-12-23,715,0,0
3,A3H99DFEG68SR,B007WTAJTO,1m2,\"[0, 0]\",This think has worked out great.,5.0,Great buy at this price!!!,1384992000,2013-11-21,382,0,0
4,A375ZM4U047O79,B007WTAJTO,2&amp;1/2Men,\"[0, 0]\",\"Bought it with Retail Packaging, arrived legit, in a orange envelope.\",5.0,best deal around,1373673600,2013-07-13,513,0,0
5,AR69M5Q8M3KXY,B007WTAJTO,2Cents!,\"[0, 0]\",It's mini storage. It doesn't do anything else and it's not supposed to.,5.0,Not a lot to really be said,1367193600,2013-04-29,588,0,0
6,A1CZ5MD1MNJ2EH,B007WTAJTO,2K1Toaster,\"[0, 0]\",I have it in my phone and it never skips a beat.,5.0,Works well,1382140800,2013-10-19,415,0,0
7,A2H3OLDRRWYZN1,B007WTAJTO,35-year Technology Consumer,\"[1, 1]\",It's hard to believe how affordable digital has become.,3.0,Doesn't work in a Galaxy S3,1412640000,2014-10-07,62,1,1
8,A3C4NVT7ZVCHFW,B007WTAJTO,4evryoung,\"[0, 0]\",Works in a HTC Rezound.,5.0,Works great,1395619200,2014-03-24,259,0,0
9,A1MY1AHZ0TGCRH,B007WTAJTO,53rdcard,\"[2, 3]\",\"in my Galaxy S4, super fast card.\",,Awesome,1384041600,2013-11-10,393,2,3
";

/// Number of data rows in [`REVIEWS_CSV`].
pub const REVIEW_COUNT: i64 = 10;

/// Writes the fixture CSV into `dir` and returns its path.
pub fn write_reviews_csv(dir: &Path) -> PathBuf {
    let path = dir.join("amazon_review.csv");
    std::fs::write(&path, REVIEWS_CSV).expect("write fixture csv");
    path
}

/// A temporary directory holding `output.db` loaded with the fixture.
pub struct Fixture {
    pub dir: TempDir,
    pub store: SqliteStore,
}

impl Fixture {
    pub async fn loaded() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let csv = write_reviews_csv(dir.path());
        let store = SqliteStore::new(dir.path().join("output.db"));
        load_csv(&csv, &store, "output").await.expect("load fixture");
        Self { dir, store }
    }

    /// Settings pointing at this fixture's store with the mock provider.
    pub fn settings(&self, overrides: SettingsOverrides) -> Settings {
        let overrides = SettingsOverrides {
            provider: Some("mock".to_string()),
            database: Some(self.store.path().to_path_buf()),
            ..overrides
        };
        Settings::resolve(&Config::default(), &overrides).expect("resolve settings")
    }
}
