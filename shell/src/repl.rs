//! Line loop, built-in dispatch, and external command launch.

use core::ffi::{CStr, c_char};
use core::fmt::Write as _;

use husk_abi::WaitOptions;
use husk_boot::Args;
use husk_io::stdio::{stderr, stdin, stdout};
use husk_io::{Direction, Stream};
use husk_lib::string::tokens;
use husk_rt::process::{Spawned, reap, replace_image, spawn};
use husk_rt::{env, errno, syscall};

const MAX_TOKENS: usize = 16;
const MAX_TOKEN_LENGTH: usize = 64;
const LINE_MAX: usize = 512;

const PROMPT: &[u8] = b"$ ";

enum Outcome {
    Continue,
    Exit,
}

/// One parsed command line: token copies, null-terminated each, plus the
/// null-terminated pointer vector replace-image expects.
struct CommandLine {
    storage: [[u8; MAX_TOKEN_LENGTH]; MAX_TOKENS],
    argc: usize,
}

enum ParseError {
    TooManyTokens,
    TokenTooLong,
}

impl CommandLine {
    const fn new() -> Self {
        CommandLine {
            storage: [[0; MAX_TOKEN_LENGTH]; MAX_TOKENS],
            argc: 0,
        }
    }

    fn parse(&mut self, line: &[u8]) -> Result<usize, ParseError> {
        self.argc = 0;
        for token in tokens(line, b" \t") {
            if self.argc == MAX_TOKENS {
                return Err(ParseError::TooManyTokens);
            }
            // Room for the terminator.
            if token.len() >= MAX_TOKEN_LENGTH {
                return Err(ParseError::TokenTooLong);
            }
            self.storage[self.argc][..token.len()].copy_from_slice(token);
            self.storage[self.argc][token.len()] = 0;
            self.argc += 1;
        }
        Ok(self.argc)
    }

    fn token(&self, index: usize) -> &[u8] {
        let slot = &self.storage[index];
        let len = husk_lib::string::find_byte(slot, 0).unwrap_or(slot.len());
        &slot[..len]
    }

    fn token_cstr(&self, index: usize) -> &CStr {
        let slot = &self.storage[index];
        let len = husk_lib::string::find_byte(slot, 0).unwrap_or(slot.len() - 1);
        CStr::from_bytes_with_nul(&slot[..len + 1]).unwrap_or_default()
    }

    /// Pointer vector over the stored tokens, terminated with null.
    fn argv(&self) -> [*const c_char; MAX_TOKENS + 1] {
        let mut vector: [*const c_char; MAX_TOKENS + 1] = [core::ptr::null(); MAX_TOKENS + 1];
        for i in 0..self.argc {
            vector[i] = self.storage[i].as_ptr() as *const c_char;
        }
        vector
    }
}

type BuiltinFn = fn(cmd: &CommandLine) -> Outcome;

struct BuiltinEntry {
    name: &'static [u8],
    desc: &'static [u8],
    func: BuiltinFn,
}

static BUILTINS: &[BuiltinEntry] = &[
    BuiltinEntry {
        name: b"exit",
        func: cmd_exit,
        desc: b"Leave the shell",
    },
    BuiltinEntry {
        name: b"cd",
        func: cmd_cd,
        desc: b"Change directory (home with no argument)",
    },
    BuiltinEntry {
        name: b"echo",
        func: cmd_echo,
        desc: b"Print arguments back to the terminal",
    },
    BuiltinEntry {
        name: b"help",
        func: cmd_help,
        desc: b"List built-in commands",
    },
];

fn find_builtin(name: &[u8]) -> Option<&'static BuiltinEntry> {
    BUILTINS.iter().find(|entry| entry.name == name)
}

/// Print `prefix: <last error description>` on the error stream.
fn report(prefix: &str) {
    let mut err = stderr();
    match errno::last_error() {
        Some(code) => {
            let _ = writeln!(err, "{}: {}", prefix, code);
        }
        None => {
            let _ = writeln!(err, "{}", prefix);
        }
    }
    let _ = err.flush();
}

fn cmd_exit(_cmd: &CommandLine) -> Outcome {
    Outcome::Exit
}

fn cmd_cd(cmd: &CommandLine) -> Outcome {
    let target = if cmd.argc > 1 {
        Some(cmd.token_cstr(1))
    } else {
        env::get_cstr(b"HOME")
    };
    match target {
        Some(dir) => {
            if syscall::chdir(dir).is_err() {
                report("Can't change directory");
            }
        }
        None => report("Can't change directory"),
    }
    Outcome::Continue
}

fn cmd_echo(cmd: &CommandLine) -> Outcome {
    let mut out = stdout();
    for i in 1..cmd.argc {
        if i > 1 {
            let _ = out.write_byte(b' ');
        }
        let _ = out.write_bytes(cmd.token(i));
    }
    let _ = out.write_byte(b'\n');
    let _ = out.flush();
    Outcome::Continue
}

fn cmd_help(_cmd: &CommandLine) -> Outcome {
    let mut out = stdout();
    let _ = out.write_bytes(b"Built-in commands:\n");
    for entry in BUILTINS {
        let _ = out.write_bytes(b"  ");
        let _ = out.write_bytes(entry.name);
        let _ = out.write_bytes(b" - ");
        let _ = out.write_bytes(entry.desc);
        let _ = out.write_byte(b'\n');
    }
    let _ = out.flush();
    Outcome::Continue
}

/// Launch an external command and wait for it.
fn run_external(cmd: &CommandLine) {
    match spawn() {
        Err(_) => report("Can't fork"),
        Ok(Spawned::Child) => {
            let argv = cmd.argv();
            let err = match replace_image(cmd.token_cstr(0), &argv[..cmd.argc + 1]) {
                Err(err) => err,
                Ok(never) => match never {},
            };
            report("Can't execute");
            syscall::exit(err.raw());
        }
        Ok(Spawned::Parent(child)) => {
            if reap(child, WaitOptions::empty()).is_err() {
                report("Can't wait for child");
            }
        }
    }
}

fn run_command(line: &[u8]) -> Outcome {
    let mut cmd = CommandLine::new();
    match cmd.parse(line) {
        Err(ParseError::TooManyTokens) => {
            report("Too many arguments");
            return Outcome::Continue;
        }
        Err(ParseError::TokenTooLong) => {
            report("Argument too long");
            return Outcome::Continue;
        }
        Ok(0) => return Outcome::Continue,
        Ok(_) => {}
    }

    match find_builtin(cmd.token(0)) {
        Some(entry) => (entry.func)(&cmd),
        None => {
            run_external(&cmd);
            Outcome::Continue
        }
    }
}

/// Strip one trailing line terminator, as the line reader leaves it in.
fn trim_line(line: &[u8]) -> &[u8] {
    match line {
        [head @ .., b'\n'] => head,
        other => other,
    }
}

/// Execute a script file line by line; stops early when a line asks the
/// shell to exit.
fn run_script(path: &CStr) -> Outcome {
    let mut file = match Stream::open(path, Direction::Input) {
        Ok(file) => file,
        Err(_) => {
            report("Can't open file for reading");
            return Outcome::Continue;
        }
    };

    let mut line = [0u8; LINE_MAX];
    loop {
        match file.read_line(&mut line) {
            Ok(Some(len)) => {
                if let Outcome::Exit = run_command(trim_line(&line[..len])) {
                    let _ = file.close();
                    return Outcome::Exit;
                }
            }
            Ok(None) => break,
            Err(_) => {
                report("Can't read file");
                break;
            }
        }
    }
    let _ = file.close();
    Outcome::Continue
}

/// Shell entry point: script files from the argument vector, otherwise
/// an interactive prompt loop until end of input or `exit`.
pub fn shell_main(args: &Args) -> i32 {
    if args.len() > 1 {
        for index in 1..args.len() {
            if let Some(path) = args.get(index)
                && let Outcome::Exit = run_script(path)
            {
                break;
            }
        }
        return 0;
    }

    let mut line = [0u8; LINE_MAX];
    loop {
        {
            let mut out = stdout();
            let _ = out.write_bytes(PROMPT);
            let _ = out.flush();
        }

        let read = stdin().read_line(&mut line);
        match read {
            Ok(Some(len)) => {
                if let Outcome::Exit = run_command(trim_line(&line[..len])) {
                    break;
                }
            }
            Ok(None) | Err(_) => break,
        }
    }
    0
}
