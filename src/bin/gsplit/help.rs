pub const COMPLETIONS_HELP: &str = "\
Discussion:
    Enable tab completion for Bash, Fish, Zsh, Elvish or PowerShell.
    The script is written to stdout, so redirect it to a file your shell loads.

Examples:
    gsplit completions bash > ~/.local/share/bash-completion/completions/gsplit
    gsplit completions zsh > ~/.zfunc/_gsplit
    gsplit completions fish > ~/.config/fish/completions/gsplit.fish";
