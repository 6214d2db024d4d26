// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    let banner = r#"
 _   _                       __     ___
| \ | |_   _ _ __ ___  _ __  \ \   / (_)____
|  \| | | | | '_ ` _ \| '_ \  \ \ / /| |_  /
| |\  | |_| | | | | | | |_) |  \ V / | |/ /
|_| \_|\__,_|_| |_| |_| .__/    \_/  |_/___|
                      |_|

    Numeric-array visualization relay
"#;
    println!("{}", banner);
}
