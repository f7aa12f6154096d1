fn main() {
    // sqlx::migrate! はマイグレーションを埋め込むため、SQL変更時に再ビルドさせる
    println!("cargo:rerun-if-changed=migrations");
}
