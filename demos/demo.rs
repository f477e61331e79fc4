use std::fmt::Write;

use cowstring::CowString;

fn main() {
    let foo = CowString::from_slice("hello").unwrap();
    println!("{} {}", foo, foo.mode());
    let bar = foo.clone();
    println!("{} {}", foo, foo.mode());
    println!("{} {}", bar, bar.mode());

    let foo = CowString::from_slice("the quick brown fox jumped over the lazy dog").unwrap();
    println!("{} {}", foo, foo.mode());
    let mut bar = foo.clone();
    println!("{} {} owners={}", foo, foo.mode(), foo.owner_count());
    bar.replace_first("quick", "sluggish").unwrap();
    println!("{} {}", foo, foo.mode());
    println!("{} {}", bar, bar.mode());

    let mut s = CowString::from_slice("  Hello").unwrap();
    s.trim().unwrap();
    s.append(", rs").unwrap();
    s.replace_all("rs", "cowstring").unwrap();
    write!(s, " len={}", s.len()).unwrap();
    println!("{}", s);

    let csv = CowString::from_slice("a,,b,").unwrap();
    for tok in csv.split(",", true) {
        println!("token: {:?}", tok);
    }
}
