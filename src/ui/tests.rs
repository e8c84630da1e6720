use insta::assert_snapshot;

use crate::error::SampleError;
use crate::system::sessions::UserSession;
use crate::system::snapshot::{HostIdentity, MemoryUsage, ProgramMemory};
use crate::ui::{Renderer, memory_column_rows};

const GIB: u64 = 1 << 30;

fn render_to_string<F>(draw: F) -> String
where
    F: FnOnce(&mut Renderer<Vec<u8>>) -> std::io::Result<()>,
{
    let mut renderer = Renderer::new(Vec::new());
    draw(&mut renderer).unwrap();
    String::from_utf8(renderer.into_inner()).unwrap()
}

fn visible(out: &str) -> String {
    out.replace('\x1b', "^[")
}

fn usage() -> MemoryUsage {
    MemoryUsage {
        physical_used: 4 * GIB,
        physical_total: 8 * GIB,
        virtual_used: 6 * GIB,
        virtual_total: 12 * GIB,
    }
}

#[test]
fn header_and_program_memory() {
    let out = render_to_string(|r| {
        r.header(10, 1)?;
        r.program_memory(&ProgramMemory { max_rss_kb: 3456 })?;
        r.separator()
    });
    assert_snapshot!(out, @r"
Nbr of samples: 10 -- every 1 secs
 Memory usage: 3456 kilobytes
---------------------------------------
");
}

#[test]
fn host_identity_section() {
    let host = HostIdentity {
        system_name: "Linux".into(),
        node_name: "build-01".into(),
        release: "6.8.0-45-generic".into(),
        version: "#45-Ubuntu SMP PREEMPT_DYNAMIC".into(),
        machine: "aarch64".into(),
    };
    let out = render_to_string(|r| r.host_identity(&host));
    assert_snapshot!(out, @r"
### System Information ###
 System Name = Linux
 Machine Name = build-01
 Version = 6.8.0-45-generic
 Release = #45-Ubuntu SMP PREEMPT_DYNAMIC
 Architecture = aarch64
---------------------------------------
");
}

#[test]
fn sessions_align_detail_column() {
    let sessions = vec![
        UserSession {
            user: "root".into(),
            line: "tty1".into(),
            host: String::new(),
        },
        UserSession {
            user: "a_rather_long_name".into(),
            line: "pts/3".into(),
            host: "192.168.1.20".into(),
        },
    ];
    let out = render_to_string(|r| r.sessions(&sessions));
    assert_snapshot!(visible(&out), @r"
### Sessions/users ###
^[7root^[8^[[15Ctty1 ()
^[7a_rather_long_name^[8^[[15Cpts/3 (192.168.1.20)
---------------------------------------
");
}

#[test]
fn empty_sessions_section() {
    let out = render_to_string(|r| r.sessions(&[]));
    assert_eq!(out, "### Sessions/users ###\n---------------------------------------\n");
}

#[test]
fn memory_line_format() {
    let out = render_to_string(|r| r.memory_line(&usage()));
    assert_eq!(out, "4.00 GB / 8.00 GB  --  6.00 GB / 12.00 GB\n");
}

#[test]
fn memory_column_places_data_at_index() {
    let rows = memory_column_rows(1, 3, &usage());
    assert_eq!(rows.len(), 3);
    assert!(rows[0].is_empty());
    assert_eq!(rows[1], "4.00 GB / 8.00 GB  --  6.00 GB / 12.00 GB");
    assert!(rows[2].is_empty());

    let non_blank = rows.iter().filter(|r| !r.is_empty()).count();
    assert_eq!(non_blank, 1);
}

#[test]
fn memory_column_first_and_last_rows() {
    let first = memory_column_rows(0, 4, &usage());
    assert!(!first[0].is_empty());
    assert!(first[1..].iter().all(String::is_empty));

    let last = memory_column_rows(3, 4, &usage());
    assert!(last[..3].iter().all(String::is_empty));
    assert!(!last[3].is_empty());
}

#[test]
fn cpu_lines_and_overwrite() {
    let out = render_to_string(|r| {
        r.cpu_usage(Ok(12.5))?;
        r.overwrite_previous_line()?;
        r.cpu_usage(Err(SampleError::DivisionByZero))
    });
    assert_eq!(
        visible(&out),
        "Total CPU usage: 12.50%\n^[[1A^[[KTotal CPU usage: n/a (division by zero)\n"
    );
}

#[test]
fn core_count_and_banner() {
    let out = render_to_string(|r| {
        r.iteration_banner(2)?;
        r.core_count(8)
    });
    assert_eq!(out, ">>>>>> iteration 2 <<<<<<\nNumber of cores: 8\n");
}
