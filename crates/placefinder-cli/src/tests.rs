use super::*;

#[test]
fn parses_search_with_defaults() {
    let cli = Cli::try_parse_from(["placefinder-cli", "search", "ramen"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Search {
            ref query,
            top_n: 5,
            page: 1,
            no_rewrite: false,
        } if query == "ramen"
    ));
}

#[test]
fn parses_search_with_all_flags() {
    let cli = Cli::try_parse_from([
        "placefinder-cli",
        "search",
        "best tacos in Austin",
        "--top-n",
        "10",
        "--page",
        "3",
        "--no-rewrite",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Search {
            ref query,
            top_n: 10,
            page: 3,
            no_rewrite: true,
        } if query == "best tacos in Austin"
    ));
}

#[test]
fn top_n_above_sixty_is_rejected() {
    let result = Cli::try_parse_from(["placefinder-cli", "search", "pizza", "--top-n", "61"]);
    assert!(result.is_err());
}

#[test]
fn top_n_zero_is_rejected() {
    let result = Cli::try_parse_from(["placefinder-cli", "search", "pizza", "--top-n", "0"]);
    assert!(result.is_err());
}

#[test]
fn page_zero_is_rejected() {
    let result = Cli::try_parse_from(["placefinder-cli", "search", "pizza", "--page", "0"]);
    assert!(result.is_err());
}

#[test]
fn search_requires_a_query() {
    let result = Cli::try_parse_from(["placefinder-cli", "search"]);
    assert!(result.is_err());
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["placefinder-cli"]).is_err());
}
