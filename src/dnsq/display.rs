//! Rendering of a received response for the terminal.
use netdns::response::DNSResponse;
use netdns::rfc1035::PacketType;

pub fn display_response(response: &DNSResponse) {
    let flags = &response.header.flags;
    print!(
        ";; id:{:#06x} {} opcode:{:?} rcode:{:?}",
        response.header.id, flags.packet_type, flags.op_code, flags.response_code
    );
    if flags.packet_type == PacketType::Response {
        print!(
            " aa:{} tc:{} rd:{} ra:{} ad:{} cd:{}",
            flags.authoritative_answer as u8,
            flags.truncated as u8,
            flags.recursion_desired as u8,
            flags.recursion_available as u8,
            flags.authentic_data as u8,
            flags.checking_disabled as u8
        );
    }
    println!();

    for question in &response.questions {
        println!(";; question: {}", question);
    }

    if response.answers.is_empty() {
        println!(";; no answer records");
    }
    for record in &response.answers {
        println!("{}", record);
    }

    if !response.authorities.is_empty() {
        println!(";; authority:");
        for record in &response.authorities {
            println!("{}", record);
        }
    }

    if let Some(opt) = response.opt() {
        println!(";; edns: {}", opt);
    }
}
