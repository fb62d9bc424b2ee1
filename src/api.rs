pub mod duration; // ISO 8601 duration decoding
pub mod fetcher; // バッチ取得と上限適用
pub mod rate_limit; // 呼び出し間隔の制御
pub mod youtube;
